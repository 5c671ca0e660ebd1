//! Format command implementation: rewrite a context document in canonical form.
//!
//! Headerless notes come out as structured documents, so `fmt --write` also
//! promotes prose to a full header.

use anyhow::{bail, Context, Result};
use cg_core::parser::is_semantic_version;
use cg_core::ContextDocument;

use crate::cli::{FmtArgs, GlobalArgs};
use crate::commands::common::ExitCode;

/// Execute the fmt command
pub(crate) fn execute(args: &FmtArgs, global: &GlobalArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read context document: {}", args.file))?;
    let mut doc = ContextDocument::parse(&content, global.default_dataset.as_deref())
        .with_context(|| format!("Failed to parse context document: {}", args.file))?;

    if let Some(version) = &args.set_version {
        if !is_semantic_version(version) {
            bail!("Version must look like MAJOR.MINOR.PATCH, got: {}", version);
        }
        if global.verbose {
            eprintln!("[verbose] Bumping version {} -> {}", doc.version, version);
        }
        doc = doc.with_version(version.as_str());
    }

    let formatted = doc
        .to_context_text()
        .context("Failed to serialize context document")?;

    if args.check {
        if formatted != content {
            eprintln!("{} is not formatted", args.file);
            return Err(ExitCode(1).into());
        }
        println!("{} is formatted", args.file);
        return Ok(());
    }

    if args.write {
        if formatted == content {
            println!("{} unchanged", args.file);
        } else {
            std::fs::write(&args.file, &formatted)
                .with_context(|| format!("Failed to write {}", args.file))?;
            println!("Formatted {}", args.file);
        }
        return Ok(());
    }

    print!("{}", formatted);
    Ok(())
}
