use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::details::{PullRequestSnapshot, PullRequestSource, Review};
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub returns at most this many items per page; a single page is fetched.
const PER_PAGE: u32 = 100;

pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
    base_url: String,
}

/// Pull request as it appears both in the REST API and in `pull_request` event payloads.
#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub merged: Option<bool>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ReviewItem {
    user: Option<User>,
    state: String,
}

#[derive(Debug, Deserialize)]
struct FileItem {
    filename: String,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        self.merged.unwrap_or(false) || self.merged_at.is_some()
    }
}

impl From<PullRequest> for PullRequestSnapshot {
    fn from(pr: PullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            author: pr.user.map(|u| u.login),
            merged_at: pr.merged_at,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

impl GitHubClient {
    pub fn with_base_url(token: String, owner_repo: &str, base_url: String) -> Result<Self> {
        let (owner, repo) = owner_repo
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| Error::Config(format!("invalid owner/repo: {owner_repo}")))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("shiplog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            token,
            owner: owner.to_string(),
            repo: repo.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}{path}", self.base_url, self.owner, self.repo)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.api_url(path);
        let mut req = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if !self.token.is_empty() {
            req = req.bearer_auth(&self.token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| Error::DetailFetch(format!("GET {what}: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::DetailFetch(format!("GET {what}: {status} {body}")));
        }
        resp.json()
            .await
            .map_err(|e| Error::DetailFetch(format!("GET {what}: {e}")))
    }

    pub async fn get_pr(&self, number: u64) -> Result<PullRequest> {
        self.get_json(&format!("/pulls/{number}"), &format!("PR #{number}"))
            .await
    }
}

impl PullRequestSource for GitHubClient {
    fn list_commits(&self, number: u64) -> BoxFuture<'_, Result<Vec<String>>> {
        async move {
            let items: Vec<CommitItem> = self
                .get_json(
                    &format!("/pulls/{number}/commits?per_page={PER_PAGE}"),
                    &format!("PR #{number} commits"),
                )
                .await?;
            Ok(items.into_iter().map(|c| c.commit.message).collect())
        }
        .boxed()
    }

    fn list_reviews(&self, number: u64) -> BoxFuture<'_, Result<Vec<Review>>> {
        async move {
            let items: Vec<ReviewItem> = self
                .get_json(
                    &format!("/pulls/{number}/reviews?per_page={PER_PAGE}"),
                    &format!("PR #{number} reviews"),
                )
                .await?;
            Ok(items
                .into_iter()
                .map(|r| Review {
                    login: r.user.map(|u| u.login),
                    state: r.state,
                })
                .collect())
        }
        .boxed()
    }

    fn list_changed_files(&self, number: u64) -> BoxFuture<'_, Result<Vec<String>>> {
        async move {
            let items: Vec<FileItem> = self
                .get_json(
                    &format!("/pulls/{number}/files?per_page={PER_PAGE}"),
                    &format!("PR #{number} files"),
                )
                .await?;
            Ok(items.into_iter().map(|f| f.filename).collect())
        }
        .boxed()
    }
}
