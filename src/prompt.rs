use crate::details::PullRequestDetails;

pub const MAX_PROMPT_COMMITS: usize = 5;
pub const MAX_PROMPT_FILES: usize = 10;

const NO_DESCRIPTION: &str = "No description provided.";

pub const SYSTEM_PROMPT: &str = r#"You are a technical writer creating changelog entries for end users of a software product. You write about what changed for the people using it, not for the developers who built it.

Guidelines:
- Be concise. One short heading and a few lines or bullets is usually enough.
- Use emoji sparingly, matched to the kind of change: 🚀 for new features, 🐛 for bug fixes, ✨ for improvements.
- Write directly. Say "Added dark mode", not "We've implemented a new dark mode feature".
- Vary sentence length and rhythm. Do not start every line the same way.
- Prefer concrete numbers over vague superlatives ("loads 40% faster", not "much faster").

Never use:
- Filler openers: "In order to", "It's important to note", "We're excited to announce".
- Inflated adjectives: "pivotal", "seamless", "robust", "cutting-edge", "game-changing".
- Hedging: "could potentially", "helps to", "allows you to".
- Manufactured enthusiasm: "We're thrilled", "Excited to share".

Output ONLY the changelog entry text in markdown. No preamble, no date heading, no sign-off, no code fences around the whole entry."#;

/// Builds the user message describing one merged pull request.
pub fn user_prompt(details: &PullRequestDetails) -> String {
    let body = if details.body.trim().is_empty() {
        NO_DESCRIPTION
    } else {
        details.body.trim()
    };

    let commits = details
        .commits
        .iter()
        .take(MAX_PROMPT_COMMITS)
        .map(|msg| format!("- {}", msg.lines().next().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n");

    let files = details
        .files
        .iter()
        .take(MAX_PROMPT_FILES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let labels = if details.labels.is_empty() {
        "none".to_string()
    } else {
        details.labels.join(", ")
    };

    format!(
        "Write a changelog entry for this merged pull request.\n\n\
         ## Title\n{title}\n\n\
         ## Description\n{body}\n\n\
         ## Commits\n{commits}\n\n\
         ## Files changed\n{files}\n\n\
         ## Labels\n{labels}",
        title = details.title,
    )
}
