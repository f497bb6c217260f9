use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_FILE: &str = "shiplog.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub defaults: Option<Defaults>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Defaults {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub changelog: Option<String>,
    pub repo: Option<String>,
    pub include_labels: Option<Vec<String>>,
    pub skip_labels: Option<Vec<String>>,
}

const TEMPLATE: &str = r#"[defaults]
# "openai", "openrouter", or the base URL of any OpenAI-compatible endpoint.
#provider = "openai"
#model = "gpt-4o-mini"

# Changelog file the entries are merged into.
#changelog = "CHANGELOG.md"

# Defaults to $GITHUB_REPOSITORY.
#repo = "owner/repo"

# Only write an entry when the pull request carries one of these labels.
#include_labels = []
# Never write an entry when the pull request carries one of these labels.
#skip_labels = ["skip-changelog"]
"#;

impl Config {
    pub fn load(dir: &Path) -> Result<Option<Config>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        let contents = xx::file::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            let span = e.span().map(|s| s.into()).unwrap_or((0, 0).into());
            crate::error::Error::Toml {
                message: e.message().to_string(),
                src: miette::NamedSource::new(path.display().to_string(), contents.clone()),
                span,
            }
        })
    }

    pub fn template() -> &'static str {
        TEMPLATE
    }
}
