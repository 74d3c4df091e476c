//! Search command - search indexed studies

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::error::DxrayError;
use crate::core::search::{preprocess_query, SearchDocument};
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (supports field prefixes and boolean operators: AND, OR, NOT)
    pub query: String,

    /// Match the query as plain words, escaping all query syntax
    #[arg(long)]
    pub literal: bool,

    /// Only print study keys
    #[arg(long)]
    pub keys_only: bool,
}

/// Search result item
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    #[serde(flatten)]
    pub document: SearchDocument,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = preprocess_query(&args.query, args.literal);
    let searcher = Arc::clone(services);
    let hits = tokio::task::spawn_blocking(move || {
        let keys = searcher.index().search(&query)?;
        let documents: Vec<_> = keys
            .into_iter()
            .map(|key| {
                let document = searcher
                    .archive
                    .open_study_by_key(&key)
                    .and_then(|study| SearchDocument::from_study(&study));
                (key, document)
            })
            .collect();
        Ok::<_, DxrayError>(documents)
    })
    .await??;

    let mut results = Vec::with_capacity(hits.len());
    for (key, document) in hits {
        match document {
            Ok(document) => results.push(SearchHit {
                rank: results.len() + 1,
                document,
            }),
            Err(e) => output::print_warning(&format!("Skipping {key}: {e}")),
        }
    }

    let output = SearchOutput {
        query: args.query.clone(),
        total_results: results.len(),
        results,
    };

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!("No studies found for '{}'", colors::label(&args.query));
                return Ok(());
            }
            if !args.keys_only {
                println!(
                    "Found {} study(s):\n",
                    colors::number(&output.total_results.to_string())
                );
            }
            for hit in &output.results {
                let doc = &hit.document;
                if args.keys_only {
                    println!("{}", doc.key);
                    continue;
                }
                println!(
                    "[{}] {} {}",
                    colors::rank(&hit.rank.to_string()),
                    colors::key(&doc.key),
                    colors::uid(&doc.uid)
                );
                println!(
                    "    {} ({}), owner {}, {}",
                    output::or_unknown(&doc.patient),
                    output::or_unknown(&doc.race),
                    output::or_unknown(&doc.owner),
                    output::or_unknown(&doc.date)
                );
            }
        }
        OutputFormat::Json => output::print_json(&output)?,
    }

    Ok(())
}
