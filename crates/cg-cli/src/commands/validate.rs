//! Validate command implementation

use anyhow::{bail, Result};
use cg_core::{validate, StaticSchemaLookup, ValidationStatus};

use crate::cli::{GlobalArgs, OutputFormat, ValidateArgs};
use crate::commands::common::{load_catalog, load_document, print_json, ExitCode};

/// Execute the validate command
pub(crate) fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let doc = load_document(&args.file, global)?;

    let Some(owner) = args.owner.as_deref().or(doc.owner.as_deref()) else {
        bail!("No owner to validate against: pass --owner or set 'owner' in the document header");
    };

    let lookup = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => StaticSchemaLookup::new(),
    };
    if global.verbose {
        eprintln!(
            "[verbose] Validating '{}' for owner '{}' against {} catalog entries",
            doc.name,
            owner,
            lookup.len()
        );
    }

    let result = validate(&doc, &lookup, owner);

    match args.output {
        OutputFormat::Json => print_json(&result.summary())?,
        OutputFormat::Text => {
            for issue in result.issues() {
                println!("{}", issue);
            }
            if result.issues().next().is_some() {
                println!();
            }
            let verdict = match result.status() {
                ValidationStatus::Passed => "Validation passed",
                ValidationStatus::Warning => "Validation passed with warnings",
                ValidationStatus::Failed => "Validation failed",
            };
            println!(
                "{}: {} error(s), {} warning(s)",
                verdict,
                result.error_count(),
                result.warning_count()
            );
        }
    }

    let failed = !result.passed() || (args.strict && result.warning_count() > 0);
    if failed {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
