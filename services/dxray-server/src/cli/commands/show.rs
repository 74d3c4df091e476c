//! Show command - print one study

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::error::DxrayError;
use crate::core::search::SearchDocument;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Study key, `<volume>/<study>`
    pub key: String,

    /// Print the search document instead of the descriptor
    #[arg(long)]
    pub document: bool,
}

/// Execute the show command
pub async fn execute(
    args: ShowArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Arc::clone(services);
    let key = args.key.clone();
    let (study, metadata) = tokio::task::spawn_blocking(move || {
        let study = loader.archive.open_study_by_key(&key)?;
        let metadata = study.load()?;
        Ok::<_, DxrayError>((study, metadata))
    })
    .await??;

    if args.document {
        let document = SearchDocument::from_metadata(study.key(), &metadata);
        match format {
            OutputFormat::Human => {
                output::print_header(&document.key);
                println!("  owner: {}", output::or_unknown(&document.owner));
                println!("  patient: {}", output::or_unknown(&document.patient));
                println!("  race: {}", output::or_unknown(&document.race));
                println!("  id: {}", output::or_unknown(&document.id));
                println!("  uid: {}", output::or_unknown(&document.uid));
                println!("  date: {}", output::or_unknown(&document.date));
                for line in document.description.lines() {
                    println!("  description: {line}");
                }
            }
            OutputFormat::Json => output::print_json(&document)?,
        }
        return Ok(());
    }

    match format {
        OutputFormat::Human => {
            let patient = &metadata.patient;
            let name = patient.decomposed_name();
            let visit = metadata.study();

            output::print_header(&study.key());
            println!("  {}: {}", colors::label("owner"), name.owner);
            println!(
                "  {}: {} ({})",
                colors::label("patient"),
                name.animal,
                name.race
            );
            println!("  {}: {}", colors::label("id"), output::or_unknown(&patient.id));
            println!(
                "  {}: {}",
                colors::label("born"),
                output::or_unknown(&patient.birth)
            );
            println!("  {}: {}", colors::label("sex"), output::or_unknown(&patient.sex));
            println!("  {}: {}", colors::label("study"), colors::uid(&visit.uid));
            println!("  {}: {}", colors::label("date"), output::or_unknown(&visit.date));
            if !visit.description.is_empty() {
                println!("  {}: {}", colors::label("description"), visit.description);
            }
            for series in &visit.series {
                println!(
                    "  {} {} {} {} {}",
                    colors::label("series"),
                    colors::number(&series.number.to_string()),
                    output::or_unknown(&series.modality),
                    output::or_unknown(&series.description),
                    colors::dim(&format!("({} instances)", series.instances.len()))
                );
            }
        }
        OutputFormat::Json => output::print_json(metadata.as_ref())?,
    }

    Ok(())
}
