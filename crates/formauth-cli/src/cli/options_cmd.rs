//! List the configurable login options.

use crate::cli::output::{self, Styled};
use anyhow::Result;
use formauth::{OptionDescriptor, RawOptions};

pub fn run(json: bool) -> Result<()> {
    let options = RawOptions::default().descriptors();

    if json {
        output::print_json(&serde_json::to_value(&options)?);
        return Ok(());
    }

    let s = Styled::new();
    output::print_header(&s);
    for option in &options {
        eprintln!("{}", option_row(&s, option));
        output::print_detail(option.help);
    }
    Ok(())
}

/// One table row. Columns are padded before styling so escape codes do not
/// count towards the width.
fn option_row(s: &Styled, option: &OptionDescriptor) -> String {
    let default = if option.value.is_empty() {
        s.dim("(required)")
    } else {
        option.value.clone()
    };
    let name = format!("{:<16}", option.name);
    let kind = format!("{:?}", option.kind).to_lowercase();
    format!("  {} {kind:<8} {default}", s.bold(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|c| *c == 'm');
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_rows_align_with_and_without_color() {
        let options = RawOptions::default().descriptors();

        for use_color in [false, true] {
            let s = Styled { use_color };
            let columns: Vec<_> = options
                .iter()
                .map(|o| {
                    let row = strip_ansi(&option_row(&s, o));
                    row.rfind(&format!("{:?}", o.kind).to_lowercase()).unwrap()
                })
                .collect();
            assert!(columns.iter().all(|c| *c == 19), "{columns:?}");
        }
    }

    #[test]
    fn test_empty_default_marked_required() {
        let options = RawOptions::default().descriptors();
        let row = option_row(&Styled { use_color: false }, &options[0]);
        assert!(row.starts_with("  username "));
        assert!(row.ends_with("(required)"));
    }
}
