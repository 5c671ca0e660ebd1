//! Glossary command implementation

use anyhow::Result;
use cg_core::GlossaryEntry;
use serde::Serialize;

use crate::cli::{GlobalArgs, GlossaryArgs, OutputFormat};
use crate::commands::common::{load_document, print_json, ExitCode};

/// A glossary entry and the context it was found in
#[derive(Debug, Serialize)]
struct GlossaryHit<'a> {
    context: &'a str,
    #[serde(flatten)]
    entry: &'a GlossaryEntry,
}

/// Execute the glossary command
pub(crate) fn execute(args: &GlossaryArgs, global: &GlobalArgs) -> Result<()> {
    let docs = args
        .files
        .iter()
        .map(|file| load_document(file, global))
        .collect::<Result<Vec<_>>>()?;

    let hits: Vec<GlossaryHit<'_>> = docs
        .iter()
        .flat_map(|doc| {
            let entries = match &args.term {
                Some(term) => doc.search_glossary(term),
                None => doc.glossary.iter().collect(),
            };
            entries.into_iter().map(move |entry| GlossaryHit {
                context: &doc.name,
                entry,
            })
        })
        .collect();

    if hits.is_empty() {
        match &args.term {
            Some(term) => eprintln!("No glossary entry matches '{}'", term),
            None => eprintln!("No glossary entries found"),
        }
        return Err(ExitCode(1).into());
    }

    match args.output {
        OutputFormat::Json => print_json(&hits),
        OutputFormat::Text => {
            for hit in &hits {
                let entry = hit.entry;
                println!("{}: {} [{}]", entry.term, entry.definition, hit.context);
                if !entry.synonyms.is_empty() {
                    println!("  Synonyms: {}", entry.synonyms.join(", "));
                }
                if !entry.related_columns.is_empty() {
                    println!("  Columns: {}", entry.related_columns.join(", "));
                }
                if let Some(examples) = &entry.examples {
                    println!("  Examples: {}", examples);
                }
            }
            Ok(())
        }
    }
}
