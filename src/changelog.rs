use std::path::Path;

use log::info;

use crate::entry::ChangelogEntry;
use crate::error::Result;

pub const DEFAULT_HEADER: &str = "# Changelog\n\nAll notable user-facing changes, newest first.\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Line {
    Heading,
    Separator,
    Preamble,
}

fn classify(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return Line::Heading;
    }
    let mut chars = trimmed.chars();
    if let Some(c @ ('-' | '*' | '_')) = chars.next() {
        let rest: String = chars.filter(|c| !c.is_whitespace()).collect();
        if rest.len() >= 2 && rest.chars().all(|r| r == c) {
            return Line::Separator;
        }
    }
    Line::Preamble
}

/// Existing changelog text split at the point where new entries go.
#[derive(Debug, PartialEq)]
enum Document<'a> {
    Empty,
    Headed { header: &'a str, rest: &'a str },
    Headless(&'a str),
}

impl<'a> Document<'a> {
    fn parse(text: &'a str) -> Self {
        if text.trim().is_empty() {
            return Document::Empty;
        }

        let mut lines = text.split_inclusive('\n').peekable();
        let Some(first) = lines.next() else {
            return Document::Empty;
        };
        if !first.starts_with("# ") && first.trim_end() != "#" {
            return Document::Headless(text);
        }

        let mut end = first.len();
        while let Some(line) = lines.next_if(|l| classify(l) == Line::Preamble) {
            end += line.len();
        }
        // a rule straight after the preamble closes the header, not an entry
        if let Some(rule) = lines.next_if(|l| classify(l) == Line::Separator) {
            end += rule.len();
            while let Some(blank) = lines.next_if(|l| l.trim().is_empty()) {
                end += blank.len();
            }
        }

        Document::Headed {
            header: &text[..end],
            rest: &text[end..],
        }
    }
}

/// Inserts `entry` into the existing changelog text (if any) and returns the new text.
pub fn merge(existing: Option<&str>, entry: &ChangelogEntry) -> String {
    let block = entry.to_markdown();
    match Document::parse(existing.unwrap_or_default()) {
        Document::Empty => format!("{DEFAULT_HEADER}{block}"),
        Document::Headless(text) => format!("{block}{text}"),
        Document::Headed { header, rest } => {
            let mut out = String::with_capacity(header.len() + block.len() + rest.len() + 2);
            out.push_str(header);
            if !header.ends_with('\n') {
                out.push('\n');
            }
            if !out.ends_with("\n\n") {
                out.push('\n');
            }
            out.push_str(&block);
            out.push_str(rest);
            out
        }
    }
}

/// Reads the changelog at `path`, merges `entry` into it, and rewrites it once.
pub fn update(path: &Path, entry: &ChangelogEntry) -> Result<()> {
    let existing = if path.exists() {
        Some(xx::file::read_to_string(path)?)
    } else {
        None
    };
    let merged = merge(existing.as_deref(), entry);
    xx::file::write(path, merged)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn entry() -> ChangelogEntry {
        ChangelogEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            body: "### 🌙 Dark mode\nToggle it in settings.".into(),
            attribution: "Shipped by @alice".into(),
        }
    }

    const BLOCK: &str =
        "## 2024-03-01\n\n### 🌙 Dark mode\nToggle it in settings.\n\nShipped by @alice\n\n---\n\n";

    #[test]
    fn test_classify() {
        assert_eq!(classify("# Title\n"), Line::Heading);
        assert_eq!(classify("## 2024-01-01\n"), Line::Heading);
        assert_eq!(classify("---\n"), Line::Separator);
        assert_eq!(classify("* * *\n"), Line::Separator);
        assert_eq!(classify("_____"), Line::Separator);
        assert_eq!(classify("--\n"), Line::Preamble);
        assert_eq!(classify("- item\n"), Line::Preamble);
        assert_eq!(classify("-*-\n"), Line::Preamble);
        assert_eq!(classify("\n"), Line::Preamble);
    }

    #[test]
    fn test_merge_absent() {
        assert_eq!(merge(None, &entry()), format!("{DEFAULT_HEADER}{BLOCK}"));
    }

    #[test]
    fn test_merge_whitespace_only() {
        assert_eq!(
            merge(Some("  \n\n\t\n"), &entry()),
            format!("{DEFAULT_HEADER}{BLOCK}")
        );
    }

    #[test]
    fn test_merge_headless_prepends() {
        let existing = "Some notes someone wrote.\n\n## 2024-01-01\n\nOld\n";
        assert_eq!(
            merge(Some(existing), &entry()),
            format!("{BLOCK}{existing}")
        );
    }

    #[test]
    fn test_merge_leading_blank_line_is_headless() {
        let existing = "\n# Changelog\n";
        assert_eq!(
            merge(Some(existing), &entry()),
            format!("{BLOCK}{existing}")
        );
    }

    #[test]
    fn test_merge_after_header_and_preamble() {
        let header = "# Changelog\n\nWhat's new in the app.\nUpdated on every merge.\n\n";
        let rest = "## 2024-02-10\n\nOld entry\n\nShipped by @bob\n\n---\n\n";
        let existing = format!("{header}{rest}");

        let merged = merge(Some(&existing), &entry());
        assert_eq!(merged, format!("{header}{BLOCK}{rest}"));
        assert!(merged.starts_with(header));
        assert!(merged.ends_with(rest));
    }

    #[test]
    fn test_merge_into_default_header_twice() {
        let first = merge(None, &entry());
        let mut second_entry = entry();
        second_entry.date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        second_entry.body = "### 🐛 Fixed crash on launch".into();

        let second = merge(Some(&first), &second_entry);
        assert_eq!(
            second,
            format!(
                "{DEFAULT_HEADER}{}{BLOCK}",
                second_entry.to_markdown()
            )
        );
        // newest first, and the header rule is not duplicated
        assert_eq!(second.matches("\n---\n").count(), 3);
        assert!(second.find("2024-03-02").unwrap() < second.find("2024-03-01").unwrap());
    }

    #[test]
    fn test_merge_header_without_trailing_newline() {
        assert_eq!(
            merge(Some("# Changelog"), &entry()),
            format!("# Changelog\n\n{BLOCK}")
        );
    }

    #[test]
    fn test_merge_header_directly_followed_by_entry() {
        let rest = "## 2024-01-01\n\nOld\n";
        let existing = format!("# Release notes\n{rest}");
        assert_eq!(
            merge(Some(&existing), &entry()),
            format!("# Release notes\n\n{BLOCK}{rest}")
        );
    }

    #[test]
    fn test_merge_keeps_old_entries_untouched() {
        let existing = "# Changelog\n\n## 2023-12-31\n\n- odd  spacing   kept\n\n***\n\n## 2023-12-30\n";
        let merged = merge(Some(existing), &entry());
        assert_eq!(
            merged,
            format!("# Changelog\n\n{BLOCK}## 2023-12-31\n\n- odd  spacing   kept\n\n***\n\n## 2023-12-30\n")
        );
    }

    #[test]
    fn test_update_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        update(&path, &entry()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{DEFAULT_HEADER}{BLOCK}")
        );
    }

    #[test]
    fn test_update_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "# Changelog\n\n## 2024-01-01\n\nOld\n").unwrap();
        update(&path, &entry()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("# Changelog\n\n{BLOCK}## 2024-01-01\n\nOld\n")
        );
    }

    #[test]
    fn test_update_unreadable_path_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as a changelog
        let err = update(dir.path(), &entry()).unwrap_err();
        assert!(matches!(err, crate::error::Error::FileIo(_)));
    }
}
