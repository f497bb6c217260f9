use std::path::{Path, PathBuf};
use std::sync::Arc;

use clx::progress::{ProgressJob, ProgressJobBuilder, ProgressStatus};
use log::{info, warn};

use crate::config::{self, Defaults};
use crate::details::{self, PullRequestSnapshot, PullRequestSource};
use crate::entry::{self, ChangelogEntry};
use crate::error::{Error, Result};
use crate::event::{self, LabelFilter};
use crate::github::{self, GitHubClient, PullRequest};
use crate::llm::{ChatClient, ChatRequest};
use crate::providers::{self, Provider};
use crate::{changelog, prompt};

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 500;

/// Model output that is known to contain some text.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent(String);

impl GeneratedContent {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::EmptyAiResponse);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct EntryOptions {
    pub event: Option<PathBuf>,
    pub pr: Option<u64>,
    pub repo: Option<String>,
    pub api_url: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub changelog: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

/// Everything the entry pipeline needs, fully resolved up front.
pub struct Context {
    pub source: Box<dyn PullRequestSource>,
    pub client: Box<dyn ChatClient>,
    pub model: String,
    pub changelog_path: PathBuf,
    pub dry_run: bool,
}

struct Setup {
    github: GitHubClient,
    client: Box<dyn ChatClient>,
    model: String,
    changelog_path: PathBuf,
    filter: LabelFilter,
}

pub async fn run(opts: EntryOptions) -> miette::Result<()> {
    let job = ProgressJobBuilder::new()
        .body("{{spinner()}} {{message | flex}}")
        .prop("message", "Reading pull request...")
        .start();

    let setup = setup(&opts)?;
    let pr = fetch_pull_request(&opts, &setup.github).await?;

    if !pr.is_merged() {
        info!("PR #{} is not merged, nothing to do", pr.number);
        finish(&job, "Skipped: not merged");
        return Ok(());
    }

    let snapshot = PullRequestSnapshot::from(pr);
    if let Some(reason) = setup.filter.skip_reason(&snapshot.labels) {
        info!("skipping PR #{}: {reason}", snapshot.number);
        finish(&job, &format!("Skipped: {reason}"));
        return Ok(());
    }

    let ctx = Context {
        source: Box::new(setup.github),
        client: setup.client,
        model: setup.model,
        changelog_path: setup.changelog_path,
        dry_run: opts.dry_run,
    };
    let entry = generate_entry(&ctx, snapshot, &job).await?;
    finish(&job, "Done");

    let text = entry.to_markdown();
    if let Some(path) = &opts.output {
        xx::file::write(path, &text).map_err(Error::from)?;
    } else {
        println!("{}", text.trim_end());
    }

    Ok(())
}

fn finish(job: &Arc<ProgressJob>, message: &str) {
    job.set_status(ProgressStatus::Done);
    job.prop("message", message);
    clx::progress::flush();
}

fn setup(opts: &EntryOptions) -> Result<Setup> {
    let config = match &opts.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load(Path::new("."))?.unwrap_or_default(),
    };
    let defaults = config.defaults.unwrap_or_default();

    let provider: Provider = opts
        .provider
        .clone()
        .or(defaults.provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.into())
        .parse()?;
    let model = opts
        .model
        .clone()
        .or(defaults.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.into());
    info!("provider: {provider}, model: {model}");

    let api_key = std::env::var(provider.key_var())
        .or_else(|_| std::env::var("AI_API_KEY"))
        .unwrap_or_default();
    if api_key.is_empty() && !matches!(provider, Provider::Custom(_)) {
        return Err(Error::Config(format!(
            "{} or AI_API_KEY must be set for provider {provider}",
            provider.key_var()
        )));
    }
    let client = providers::build_client(&provider, api_key)?;

    let owner_repo = opts
        .repo
        .clone()
        .or(defaults.repo.clone())
        .ok_or_else(|| Error::Config("no repository: pass --repo or set GITHUB_REPOSITORY".into()))?;
    let token = std::env::var("GITHUB_TOKEN").unwrap_or_default();
    if token.is_empty() {
        warn!("GITHUB_TOKEN not set, GitHub requests are unauthenticated");
    }
    let api_url = opts
        .api_url
        .clone()
        .unwrap_or_else(|| github::DEFAULT_API_URL.into());
    let github = GitHubClient::with_base_url(token, &owner_repo, api_url)?;

    let changelog_path = opts
        .changelog
        .clone()
        .or(defaults.changelog.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG));

    Ok(Setup {
        github,
        client,
        model,
        changelog_path,
        filter: label_filter(&defaults),
    })
}

fn label_filter(defaults: &Defaults) -> LabelFilter {
    LabelFilter {
        include: defaults.include_labels.clone().unwrap_or_default(),
        skip: defaults.skip_labels.clone().unwrap_or_default(),
    }
}

async fn fetch_pull_request(opts: &EntryOptions, github: &GitHubClient) -> Result<PullRequest> {
    match (opts.pr, &opts.event) {
        (Some(number), _) => github.get_pr(number).await,
        (None, Some(path)) => event::load(path),
        (None, None) => Err(Error::Config(
            "no pull request: pass --pr or --event (or set GITHUB_EVENT_PATH)".into(),
        )),
    }
}

/// Runs the pipeline for one merged pull request and returns the entry that was merged.
pub async fn generate_entry(
    ctx: &Context,
    snapshot: PullRequestSnapshot,
    job: &Arc<ProgressJob>,
) -> Result<ChangelogEntry> {
    job.prop(
        "message",
        &format!("Fetching details for PR #{}...", snapshot.number),
    );
    let details = details::aggregate(snapshot, &*ctx.source).await?;

    job.prop("message", "Generating changelog entry...");
    let user = prompt::user_prompt(&details);
    let content = generate_content(&*ctx.client, &ctx.model, &user).await?;
    let entry = entry::format_entry(&content, &details);
    info!("entry for PR #{} dated {}", details.number, entry.date);

    if ctx.dry_run {
        info!("dry run: not updating {}", ctx.changelog_path.display());
    } else {
        job.prop(
            "message",
            &format!("Updating {}...", ctx.changelog_path.display()),
        );
        changelog::update(&ctx.changelog_path, &entry)?;
    }

    Ok(entry)
}

pub async fn generate_content(
    client: &dyn ChatClient,
    model: &str,
    user_prompt: &str,
) -> Result<GeneratedContent> {
    let request = ChatRequest {
        model: model.to_string(),
        system: prompt::SYSTEM_PROMPT.to_string(),
        user: user_prompt.to_string(),
        temperature: TEMPERATURE,
        max_tokens: MAX_OUTPUT_TOKENS,
    };
    let text = client
        .complete(&request)
        .await?
        .ok_or(Error::EmptyAiResponse)?;
    GeneratedContent::new(text)
}
