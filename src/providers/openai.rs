use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::llm::{ChatClient, ChatRequest};

/// Client for any endpoint speaking the OpenAI chat-completions protocol.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl OpenAIProvider {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shiplog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ChatClient for OpenAIProvider {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<Option<String>>> {
        async move {
            let body = json!({
                "model": request.model,
                "temperature": request.temperature,
                "max_tokens": request.max_tokens,
                "messages": [
                    { "role": "system", "content": request.system },
                    { "role": "user", "content": request.user },
                ],
            });

            let mut req = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .json(&body);
            if !self.api_key.is_empty() {
                req = req.bearer_auth(&self.api_key);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| Error::Llm(format!("POST chat/completions: {e}")))?;
            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::Llm(format!("{status}: {body}")));
            }

            let response: ChatResponse = resp.json().await?;
            if let Some(u) = &response.usage {
                debug!(
                    "usage: {} input, {} output tokens",
                    u.prompt_tokens, u.completion_tokens
                );
            }

            Ok(response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content))
        }
        .boxed()
    }
}
