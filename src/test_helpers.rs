use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::details::{PullRequestDetails, PullRequestSource, Review};
use crate::error::{Error, Result};
use crate::llm::{ChatClient, ChatRequest};

pub struct MockChatClient {
    responses: Mutex<Vec<Option<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    pub fn new(responses: Vec<Option<String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatClient for MockChatClient {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<Option<String>>> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        let resp = if responses.is_empty() {
            Err(Error::Llm("no more mock responses".into()))
        } else {
            Ok(responses.remove(0))
        };
        async move { resp }.boxed()
    }
}

#[derive(Default)]
pub struct MockPullRequestSource {
    pub commits: Vec<String>,
    pub reviews: Vec<Review>,
    pub files: Vec<String>,
    pub fail: bool,
}

impl MockPullRequestSource {
    fn respond<T: Clone + Send + 'static>(&self, what: &str, value: &T) -> BoxFuture<'_, Result<T>> {
        let resp = if self.fail {
            Err(Error::DetailFetch(format!("{what}: 503 Service Unavailable")))
        } else {
            Ok(value.clone())
        };
        async move { resp }.boxed()
    }
}

impl PullRequestSource for MockPullRequestSource {
    fn list_commits(&self, _number: u64) -> BoxFuture<'_, Result<Vec<String>>> {
        self.respond("commits", &self.commits)
    }

    fn list_reviews(&self, _number: u64) -> BoxFuture<'_, Result<Vec<Review>>> {
        self.respond("reviews", &self.reviews)
    }

    fn list_changed_files(&self, _number: u64) -> BoxFuture<'_, Result<Vec<String>>> {
        self.respond("files", &self.files)
    }
}

pub fn review(login: &str, state: &str) -> Review {
    Review {
        login: Some(login.into()),
        state: state.into(),
    }
}

pub fn details(author: &str, reviewers: &[&str]) -> PullRequestDetails {
    PullRequestDetails {
        number: 42,
        title: "Add dark mode".into(),
        body: "Adds a theme toggle to the settings screen.".into(),
        author: author.into(),
        reviewers: reviewers.iter().map(|r| r.to_string()).collect(),
        commits: vec!["feat: add dark mode".into()],
        files: vec!["src/theme.rs".into()],
        labels: vec!["feature".into()],
        merged_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    }
}
