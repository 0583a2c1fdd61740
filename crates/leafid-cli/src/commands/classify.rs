use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use leafid_cli::input::supported_list;
use leafid_cli::{apply_overrides, build_identifier, expand_inputs, render_report, render_verdict, Overrides};
use leafid_core::decode::decode_path;
use leafid_core::metadata::MetadataTable;
use leafid_core::narration::decision_narration;
use leafid_core::{ConfigHandle, Identification, LeafError};

#[derive(Serialize)]
struct FileResult<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    identification: Option<&'a Identification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    narration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_classify(
    handle: ConfigHandle,
    inputs: Vec<PathBuf>,
    recursive: bool,
    skip_validation: bool,
    overrides: Overrides,
    json: bool,
    narrate: bool,
    threads: Option<usize>,
) -> Result<(), String> {
    let start = Instant::now();

    if inputs.is_empty() {
        return Err("No input files or directories specified".to_string());
    }
    let inputs = expand_inputs(&inputs, recursive)?;
    if inputs.is_empty() {
        return Err(format!(
            "No supported image files found (supported: {})",
            supported_list()
        ));
    }

    let mut config = handle.config;
    apply_overrides(&mut config, &overrides)?;

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
    }

    let identifier = build_identifier(&config)?;
    let store = MetadataTable::reference();

    let processed = AtomicUsize::new(0);
    let total = inputs.len();

    // The classifier serializes inference; decoding and the gate run in parallel
    let results: Vec<Result<Identification, LeafError>> = inputs
        .par_iter()
        .map(|path| {
            let image = decode_path(path)?;
            let outcome = identifier.identify(&image, skip_validation);
            let count = processed.fetch_add(1, Ordering::SeqCst) + 1;
            if !json && total > 1 {
                eprintln!("[{}/{}] {}", count, total, path.display());
            }
            outcome
        })
        .collect();

    if let Some(fatal) = results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .find(|e| e.is_fatal())
    {
        return Err(fatal.to_string());
    }

    let mut failures = 0;
    let mut entries = Vec::with_capacity(total);

    for (path, result) in inputs.iter().zip(results.iter()) {
        let narration = match result {
            Ok(Identification::Classified(report)) if narrate => {
                decision_narration(&report.decision, store)
            }
            _ => None,
        };

        if json {
            entries.push(FileResult {
                path: path.display().to_string(),
                identification: result.as_ref().ok(),
                narration,
                error: result.as_ref().err().map(|e| e.to_string()),
            });
            if result.is_err() {
                failures += 1;
            }
            continue;
        }

        if total > 1 {
            println!("== {} ==", path.display());
        }
        match result {
            Ok(Identification::Rejected(verdict)) => {
                println!("{}", render_verdict(verdict));
                println!("Use --skip-validation to classify anyway.");
            }
            Ok(Identification::Classified(report)) => {
                println!("{}", render_report(report, store));
                if let Some(text) = narration {
                    println!("\nNarration: {}", text);
                }
            }
            Err(e) => {
                failures += 1;
                println!("Error: {}", e);
            }
        }
        if total > 1 {
            println!();
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to serialize results: {}", e))?;
        println!("{}", out);
    } else if total > 1 {
        println!(
            "Processed {} files in {:.2}s ({} failed)",
            total,
            start.elapsed().as_secs_f64(),
            failures
        );
    }

    if failures > 0 {
        Err(format!("{} of {} files could not be classified", failures, total))
    } else {
        Ok(())
    }
}
