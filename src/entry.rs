use std::fmt;

use chrono::NaiveDate;

use crate::details::PullRequestDetails;
use crate::generate::GeneratedContent;

/// One dated changelog block, ready to be merged into the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogEntry {
    pub date: NaiveDate,
    pub body: String,
    pub attribution: String,
}

impl ChangelogEntry {
    /// Renders the block, ending with a `---` rule and a blank line.
    pub fn to_markdown(&self) -> String {
        format!(
            "## {date}\n\n{body}\n\n{attribution}\n\n---\n\n",
            date = self.date.format("%Y-%m-%d"),
            body = self.body,
            attribution = self.attribution,
        )
    }
}

impl fmt::Display for ChangelogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

pub fn format_entry(content: &GeneratedContent, details: &PullRequestDetails) -> ChangelogEntry {
    ChangelogEntry {
        date: details.merged_at.date_naive(),
        body: content.as_str().trim().to_string(),
        attribution: attribution(&details.author, &details.reviewers),
    }
}

pub fn attribution(author: &str, reviewers: &[String]) -> String {
    if reviewers.is_empty() {
        return format!("Shipped by @{author}");
    }
    let reviewed = reviewers
        .iter()
        .map(|r| format!("@{r}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Shipped by @{author} • Reviewed by {reviewed}")
}
