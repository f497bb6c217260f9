use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::github::PullRequest;

/// The parts of a GitHub `pull_request` webhook payload we read.
#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    #[serde(default)]
    action: Option<String>,
    pull_request: Option<PullRequest>,
}

/// Reads the pull request out of the event payload at `path` (usually `$GITHUB_EVENT_PATH`).
pub fn load(path: &Path) -> Result<PullRequest> {
    let contents = xx::file::read_to_string(path)?;
    parse(&contents)
}

pub fn parse(contents: &str) -> Result<PullRequest> {
    let event: PullRequestEvent = serde_json::from_str(contents)
        .map_err(|e| Error::Event(format!("invalid event payload: {e}")))?;
    if let Some(action) = &event.action {
        log::debug!("event action: {action}");
    }
    event
        .pull_request
        .ok_or_else(|| Error::Event("payload has no pull_request; is this a pull_request event?".into()))
}

/// Label rules deciding whether a merged pull request gets an entry.
#[derive(Debug, Clone, Default)]
pub struct LabelFilter {
    pub include: Vec<String>,
    pub skip: Vec<String>,
}

impl LabelFilter {
    /// Returns why the pull request should be skipped, or `None` to proceed.
    pub fn skip_reason(&self, labels: &[String]) -> Option<String> {
        let has = |wanted: &String| labels.iter().any(|l| l.eq_ignore_ascii_case(wanted));

        if let Some(label) = self.skip.iter().find(|&s| has(s)) {
            return Some(format!("labelled '{label}'"));
        }
        if !self.include.is_empty() && !self.include.iter().any(has) {
            return Some(format!(
                "none of the required labels ({}) present",
                self.include.join(", ")
            ));
        }
        None
    }
}
