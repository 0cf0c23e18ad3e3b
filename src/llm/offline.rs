//! Heuristic suggestions that need no provider.
//!
//! Used with `--offline` to exercise the selector without an API key.

use std::path::Path;

use async_trait::async_trait;

use crate::error::AiError;
use crate::git::RepoContext;

use super::client::SuggestionGenerator;
use super::suggestion::{ConfidenceTier, Suggestion};

const DEFAULT_SCOPE: &str = "core";
const GITMOJI_PREFIX: &str = "✨ ";

/// Generator that builds three suggestions from file names and the branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl SuggestionGenerator for OfflineGenerator {
    async fn generate(
        &self,
        ctx: &RepoContext,
        style: &str,
    ) -> Result<Vec<Suggestion>, AiError> {
        Ok(offline_suggestions(ctx, style))
    }
}

/// Scope from the first changed file: its parent directory, or its stem at top level.
pub fn infer_scope(files: &[String]) -> String {
    let Some(first) = files.first() else {
        return DEFAULT_SCOPE.to_string();
    };

    let path = Path::new(first);
    let from_parent = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned());

    from_parent
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|scope| !scope.is_empty())
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string())
}

/// Short description of what was touched.
pub fn describe_changes(files: &[String]) -> String {
    match files {
        [] => "update project files".to_string(),
        [single] => {
            let name = Path::new(single)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| single.clone());
            format!("update {name}")
        }
        many => format!("update {} files", many.len()),
    }
}

/// Leading verbs for each rank plus a message prefix for the style.
pub fn style_verbs(style: &str) -> ([&'static str; 3], &'static str) {
    match style.trim().to_ascii_lowercase().as_str() {
        "conventional" => (["feat", "fix", "chore"], ""),
        "gitmoji" => (["feat", "fix", "chore"], GITMOJI_PREFIX),
        _ => (["add", "fix", "update"], ""),
    }
}

/// Build the three ranked suggestions for `ctx`.
pub fn offline_suggestions(ctx: &RepoContext, style: &str) -> Vec<Suggestion> {
    let scope = infer_scope(&ctx.changed_files);
    let description = describe_changes(&ctx.changed_files);
    let (verbs, prefix) = style_verbs(style);
    let conventional = matches!(
        style.trim().to_ascii_lowercase().as_str(),
        "conventional" | "gitmoji"
    );

    let subject = |verb: &str| {
        if conventional {
            format!("{prefix}{verb}({scope}): {description}")
        } else {
            let rest = description.strip_prefix("update ").unwrap_or(&description);
            format!("{prefix}{verb} {rest}")
        }
    };

    let reasons = [
        format!(
            "Branch '{}' and the files under '{}' suggest new functionality",
            ctx.branch_name, scope
        ),
        format!("Could be a correction within '{scope}'"),
        "Conservative option if the change is internal maintenance".to_string(),
    ];
    let tiers = [ConfidenceTier::High, ConfidenceTier::Medium, ConfidenceTier::Low];

    verbs
        .into_iter()
        .zip(tiers)
        .zip(reasons)
        .enumerate()
        .map(|(idx, ((verb, tier), reasoning))| Suggestion {
            rank: idx as u32 + 1,
            confidence: tier.as_str().to_string(),
            message: subject(verb),
            body: String::new(),
            reasoning,
        })
        .collect()
}
