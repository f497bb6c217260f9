pub mod openai;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::llm::ChatClient;

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    OpenAI,
    OpenRouter,
    /// Any OpenAI-compatible endpoint given as a URL.
    Custom(String),
}

impl Provider {
    pub fn endpoint(&self) -> &str {
        match self {
            Provider::OpenAI => OPENAI_ENDPOINT,
            Provider::OpenRouter => OPENROUTER_ENDPOINT,
            Provider::Custom(url) => url,
        }
    }

    /// Environment variable holding the API key for this provider, before the `AI_API_KEY` fallback.
    pub fn key_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::OpenAI | Provider::Custom(_) => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAI),
            "openrouter" => Ok(Provider::OpenRouter),
            url if url.starts_with("http") => Ok(Provider::Custom(url.to_string())),
            other => Err(Error::Config(format!(
                "unknown provider '{other}' (expected openai, openrouter or an http(s) URL)"
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => f.write_str("openai"),
            Provider::OpenRouter => f.write_str("openrouter"),
            Provider::Custom(url) => f.write_str(url),
        }
    }
}

pub fn build_client(provider: &Provider, api_key: String) -> crate::error::Result<Box<dyn ChatClient>> {
    let client = openai::OpenAIProvider::new(api_key, provider.endpoint().to_string())?;
    Ok(Box::new(client))
}
