//! Form login workflow: locate, fill, submit, verify.

pub mod filler;
pub mod locator;
pub mod orchestrator;
pub mod plugin;
pub mod submit;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;
