use futures_util::future::BoxFuture;

use crate::error::Result;

/// One single-turn chat completion: a system message and a user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

pub trait ChatClient: Send + Sync {
    /// Returns the text of the first choice, or `None` if the endpoint produced no content.
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<Option<String>>>;
}
