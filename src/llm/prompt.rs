//! Prompt construction for commit message suggestions.

use crate::git::RepoContext;

const SYSTEM_PROMPT: &str = r#"You are an expert software engineer specialized in writing clean, semantic, and meaningful Git commit messages.

Your job is to analyze the provided context and generate the best possible commit message.

## Context you will receive
- Git diff: the actual staged code changes (may be truncated)
- Changed files: the files staged for this commit
- Branch name: the current branch name
- Recent commit history: the latest commit subjects in this repository
- Project context: the README or project description
- Commit style: the user's preferred commit message format
- Language: the language the commit message must be written in

## Commit styles
- conventional: Conventional Commits (feat, fix, chore, docs, refactor, test, style, perf, ci, build)
- gitmoji: gitmoji prefixes (✨, 🐛, ♻️, 📝, ...)
- free: no specific format, just clear and descriptive
- custom: follow the user's custom format exactly as described

## Rules
1. Analyze the diff deeply. Understand WHAT changed and WHY it likely changed.
2. Use the branch name as a hint for intent (`feat/user-auth` suggests authentication work).
3. Use recent commits to match the team's tone, language and style.
4. Use the project context to understand the domain and avoid generic messages.
5. Changed files give structural hints: migrations, tests, controllers, etc.
6. Never mention file names in the commit title unless truly necessary.
7. Keep the title concise (max 72 characters).
8. If the change is complex, add a short body explaining the WHY, not the WHAT.
9. Generate exactly 3 commit message options ranked by confidence.
10. Respond ONLY with valid JSON. No explanation, no markdown.

## Output format (strict JSON)
{
  "suggestions": [
    {
      "rank": 1,
      "confidence": "high",
      "message": "feat(auth): add JWT refresh token rotation",
      "body": "Implements refresh token rotation to improve security.\nOld tokens are invalidated on each refresh cycle.",
      "reasoning": "Branch name and diff clearly indicate authentication token logic"
    },
    {
      "rank": 2,
      "confidence": "medium",
      "message": "feat(auth): implement token refresh endpoint",
      "body": null,
      "reasoning": "Alternative framing focusing on the endpoint rather than the strategy"
    },
    {
      "rank": 3,
      "confidence": "low",
      "message": "chore(auth): update token handling logic",
      "body": null,
      "reasoning": "More conservative option if the change is considered internal"
    }
  ],
  "detected_style": "conventional",
  "language": "en"
}"#;

/// System instructions shared by every provider.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user message from the collected repository context.
///
/// `style` is passed through verbatim. When `custom_format` is non-empty it is
/// appended to the style so the model can follow it for the `custom` style.
pub fn build_user_prompt(
    ctx: &RepoContext,
    style: &str,
    custom_format: &str,
    language: &str,
) -> String {
    let commit_style = if custom_format.trim().is_empty() {
        style.to_string()
    } else {
        format!("{style}\n{}", custom_format.trim())
    };

    format!(
        "<commit_style>{commit_style}</commit_style>\n\
         <language>{language}</language>\n\
         <branch_name>{branch}</branch_name>\n\
         <changed_files>{files}</changed_files>\n\
         <recent_commits>{commits}</recent_commits>\n\
         <project_context>{project}</project_context>\n\
         <git_diff>{diff}</git_diff>",
        branch = ctx.branch_name,
        files = ctx.changed_files.join("\n"),
        commits = ctx.recent_commits.join("\n"),
        project = ctx.project_context,
        diff = ctx.staged_diff,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> RepoContext {
        RepoContext {
            branch_name: "feat/login".to_string(),
            staged_diff: "+fn login() {}\n".to_string(),
            changed_files: vec!["src/auth/login.rs".to_string(), "src/lib.rs".to_string()],
            recent_commits: vec!["fix: typo".to_string(), "chore: bump deps".to_string()],
            project_context: "# Demo\nA demo project.\n".to_string(),
        }
    }

    #[test]
    fn test_system_prompt_sections() {
        let prompt = system_prompt();
        assert!(prompt.contains("conventional"));
        assert!(prompt.contains("gitmoji"));
        assert!(prompt.contains("exactly 3"));
        assert!(prompt.contains(r#""suggestions""#));
        assert!(prompt.contains(r#""confidence""#));
        assert!(prompt.contains(r#""reasoning""#));
    }

    #[test]
    fn test_user_prompt_includes_all_sections() {
        let prompt = build_user_prompt(&sample_context(), "conventional", "", "en");

        assert!(prompt.contains("<commit_style>conventional</commit_style>"));
        assert!(prompt.contains("<language>en</language>"));
        assert!(prompt.contains("<branch_name>feat/login</branch_name>"));
        assert!(prompt.contains("src/auth/login.rs\nsrc/lib.rs"));
        assert!(prompt.contains("fix: typo\nchore: bump deps"));
        assert!(prompt.contains("A demo project."));
        assert!(prompt.contains("+fn login() {}"));
    }

    #[test]
    fn test_user_prompt_gitmoji_style() {
        let prompt = build_user_prompt(&sample_context(), "gitmoji", "", "pt");
        assert!(prompt.contains("<commit_style>gitmoji</commit_style>"));
        assert!(prompt.contains("<language>pt</language>"));
    }

    #[test]
    fn test_user_prompt_custom_format() {
        let prompt = build_user_prompt(
            &sample_context(),
            "custom",
            "[TICKET-123] <summary>",
            "en",
        );
        assert!(prompt.contains("<commit_style>custom\n[TICKET-123] <summary></commit_style>"));
    }

    #[test]
    fn test_user_prompt_empty_sections() {
        let ctx = RepoContext {
            branch_name: "main".to_string(),
            staged_diff: "diff".to_string(),
            ..Default::default()
        };
        let prompt = build_user_prompt(&ctx, "free", "", "en");
        assert!(prompt.contains("<recent_commits></recent_commits>"));
        assert!(prompt.contains("<project_context></project_context>"));
    }
}
