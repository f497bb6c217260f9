#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("config error: {0}")]
    #[diagnostic(code(shiplog::config))]
    Config(String),

    #[error("failed to fetch pull request details: {0}")]
    #[diagnostic(code(shiplog::detail_fetch))]
    DetailFetch(String),

    #[error("the model returned an empty response")]
    #[diagnostic(
        code(shiplog::empty_ai_response),
        help("check the model name and that the endpoint supports chat completions")
    )]
    EmptyAiResponse,

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("event error: {0}")]
    Event(String),

    #[error("{message}")]
    #[diagnostic()]
    Toml {
        message: String,
        #[source_code]
        src: miette::NamedSource<String>,
        #[label("{message}")]
        span: miette::SourceSpan,
    },

    #[error("file error: {0}")]
    #[diagnostic(code(shiplog::file_io))]
    FileIo(#[from] xx::XXError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
