use serde::Serialize;
use std::path::PathBuf;

use leafid_cli::{apply_overrides, expand_inputs, render_verdict, Overrides};
use leafid_core::decode::decode_path;
use leafid_core::{ConfigHandle, LeafPlausibilityGate, LeafVerdict};

#[derive(Serialize)]
struct CheckResult {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<LeafVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the leaf gate only. No model is loaded.
pub fn cmd_check(
    handle: ConfigHandle,
    inputs: Vec<PathBuf>,
    recursive: bool,
    policy: Option<String>,
    json: bool,
) -> Result<(), String> {
    let inputs = expand_inputs(&inputs, recursive)?;
    if inputs.is_empty() {
        return Err("No supported image files found".to_string());
    }

    let mut config = handle.config;
    apply_overrides(
        &mut config,
        &Overrides {
            policy,
            ..Overrides::default()
        },
    )?;
    let gate = LeafPlausibilityGate::new(config.gate);

    let results: Vec<CheckResult> = inputs
        .iter()
        .map(|path| match decode_path(path) {
            Ok(image) => CheckResult {
                path: path.display().to_string(),
                verdict: Some(gate.evaluate(&image)),
                error: None,
            },
            Err(e) => CheckResult {
                path: path.display().to_string(),
                verdict: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&results)
            .map_err(|e| format!("Failed to serialize results: {}", e))?;
        println!("{}", out);
    } else {
        for result in &results {
            match (&result.verdict, &result.error) {
                (Some(verdict), _) => println!("{}: {}", result.path, render_verdict(verdict)),
                (None, Some(error)) => println!("{}: ERROR     {}", result.path, error),
                (None, None) => {}
            }
        }
    }

    let errors = results.iter().filter(|r| r.error.is_some()).count();
    if errors > 0 {
        return Err(format!("{} files could not be decoded", errors));
    }
    Ok(())
}
