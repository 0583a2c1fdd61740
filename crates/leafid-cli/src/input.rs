//! Input file handling.

use std::path::{Path, PathBuf};

use leafid_core::decode::{is_supported_image, SUPPORTED_EXTENSIONS};

/// Expand files and directories into a sorted list of image files.
///
/// Directories are scanned for supported extensions; subdirectories only
/// when `recursive` is set.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_images_from_dir(input, recursive, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(format!("Path not found: {}", input.display()));
        }
    }

    files.sort();
    Ok(files)
}

fn collect_images_from_dir(
    dir: &Path,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Error reading directory entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() && recursive {
            collect_images_from_dir(&path, recursive, files)?;
        } else if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Human-readable list of accepted extensions.
pub fn supported_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("more");
        std::fs::create_dir(&nested).unwrap();
        for name in ["b.jpg", "a.PNG", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::write(nested.join("c.webp"), b"x").unwrap();

        let flat = expand_inputs(&[dir.path().to_path_buf()], false).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.PNG", "b.jpg"]);

        let deep = expand_inputs(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_missing_path() {
        let err = expand_inputs(&[PathBuf::from("/no/such/leaf.jpg")], false).unwrap_err();
        assert!(err.contains("Path not found"));
    }

    #[test]
    fn test_supported_list() {
        assert!(supported_list().starts_with(".jpg, .jpeg"));
    }
}
