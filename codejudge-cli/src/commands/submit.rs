//! Submit command

use anyhow::{Context as _, Result};
use clap::Args;
use codejudge_core::{Language, TaskId, Verdict};
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::report;
use crate::context::Context;
use crate::output::{verdict_badge, OutputFormat};

/// Submit a solution file
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Task ID
    pub task: TaskId,

    /// Source file
    pub file: PathBuf,

    /// python or java; guessed from the file extension when omitted
    #[arg(short, long)]
    pub language: Option<Language>,
}

/// Execute the submit command
pub async fn execute(ctx: &Context, args: SubmitArgs) -> Result<()> {
    let language = resolve_language(args.language, &args.file);
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {:?}", args.file))?;

    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner(&format!("Submitting {} solution...", language));
    let result = client.submissions().submit(args.task, language, source).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let verdict = result.map_err(|e| report(ctx, e))?;
    match ctx.output.format() {
        OutputFormat::Json => println!("{}", serde_json::json!({ "verdict": verdict })),
        _ => println!("{}", verdict_badge(verdict)),
    }

    if verdict == Verdict::Incorrect {
        anyhow::bail!("Solution rejected");
    }
    Ok(())
}

/// An explicit flag wins, then the file extension, then the default language.
fn resolve_language(flag: Option<Language>, file: &Path) -> Language {
    flag.or_else(|| {
        file.extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(None, Path::new("main.java")), Language::Java);
        assert_eq!(resolve_language(None, Path::new("sol.py")), Language::Python);
        assert_eq!(resolve_language(None, Path::new("solution")), Language::Python);
        assert_eq!(
            resolve_language(Some(Language::Python), Path::new("Main.java")),
            Language::Python
        );
    }
}
