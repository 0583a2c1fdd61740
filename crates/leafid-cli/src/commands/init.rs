use std::path::PathBuf;

use leafid_core::config::{default_user_config_path, write_default_config};

/// Write the default configuration file.
///
/// Safe to run repeatedly: an existing file is kept unless `force` is set.
pub fn cmd_init(path: Option<PathBuf>, force: bool) -> Result<(), String> {
    let path = match path {
        Some(path) => path,
        None => default_user_config_path()
            .ok_or_else(|| "Could not determine home directory".to_string())?,
    };

    write_default_config(&path, force).map_err(|e| e.to_string())?;

    println!("Wrote default configuration to {}", path.display());
    println!("Edit it to tune the leaf gate, confidence thresholds and model path.");
    Ok(())
}
