use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use log::{debug, info};

use crate::error::Result;

/// Login GitHub shows for pull requests whose author account was deleted.
const UNKNOWN_AUTHOR: &str = "ghost";

/// What the triggering event tells us about the merged pull request.
#[derive(Debug, Clone, Default)]
pub struct PullRequestSnapshot {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub author: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
}

/// Snapshot enriched with commits, approvals and touched files.
#[derive(Debug, Clone)]
pub struct PullRequestDetails {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub reviewers: Vec<String>,
    pub commits: Vec<String>,
    pub files: Vec<String>,
    pub labels: Vec<String>,
    pub merged_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Review {
    pub login: Option<String>,
    pub state: String,
}

/// Read-only queries against whatever hosts the pull request.
pub trait PullRequestSource: Send + Sync {
    fn list_commits(&self, number: u64) -> BoxFuture<'_, Result<Vec<String>>>;
    fn list_reviews(&self, number: u64) -> BoxFuture<'_, Result<Vec<Review>>>;
    fn list_changed_files(&self, number: u64) -> BoxFuture<'_, Result<Vec<String>>>;
}

pub async fn aggregate(
    snapshot: PullRequestSnapshot,
    source: &dyn PullRequestSource,
) -> Result<PullRequestDetails> {
    let number = snapshot.number;
    let (commits, reviews, files) = tokio::try_join!(
        source.list_commits(number),
        source.list_reviews(number),
        source.list_changed_files(number),
    )?;
    debug!(
        "PR #{number}: {} commits, {} reviews, {} files",
        commits.len(),
        reviews.len(),
        files.len()
    );

    let reviewers = approved_reviewers(&reviews);
    info!("PR #{number} approved by {} reviewer(s)", reviewers.len());

    Ok(PullRequestDetails {
        number,
        title: snapshot.title,
        body: snapshot.body.unwrap_or_default(),
        author: snapshot
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.into()),
        reviewers,
        commits,
        files,
        labels: snapshot.labels,
        merged_at: snapshot.merged_at.unwrap_or_else(Utc::now),
    })
}

/// Distinct logins with an approving review, in the order they first approved.
pub fn approved_reviewers(reviews: &[Review]) -> Vec<String> {
    let mut reviewers: Vec<String> = Vec::new();
    for review in reviews {
        if !review.state.eq_ignore_ascii_case("approved") {
            continue;
        }
        let Some(login) = review.login.as_deref().map(str::trim) else {
            continue;
        };
        if login.is_empty() || reviewers.iter().any(|r| r == login) {
            continue;
        }
        reviewers.push(login.to_string());
    }
    reviewers
}
