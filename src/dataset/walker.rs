use crate::error::{EdgevalError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List the image files directly inside `dir`, sorted by path.
///
/// Non-recursive: one directory corresponds to one subset/category slice of
/// the dataset. Filtering is by file extension only (case-insensitive); the
/// bytes are never decoded here — pixel formats are the inference server's
/// concern.
///
/// A missing or non-directory path is an error, not an empty listing, so a
/// mistyped dataset root cannot silently evaluate zero items.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EdgevalError::InvalidInput(format!(
            "dataset directory does not exist: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !matches!(
            extension.as_str(),
            "jpg" | "jpeg" | "png" | "bmp" | "tif" | "tiff"
        ) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    // Deterministic evaluation order across runs and platforms
    files.sort();

    log::info!("Discovered {} images in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_images_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("b.jpg"), b"\xff\xd8\xff").unwrap();
        fs::write(root.join("a.PNG"), b"\x89PNG\r\n\x1a\n").unwrap();
        fs::write(root.join("c.bmp"), b"BM").unwrap();
        fs::write(root.join("labels.txt"), "not an image").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/d.jpg"), b"\xff\xd8\xff").unwrap(); // below max_depth

        let files = discover_images(root).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.bmp"]);
    }

    #[test]
    fn test_discover_images_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_images(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 0);
    }

    #[test]
    fn test_discover_images_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("no-such-dir");
        let err = discover_images(&missing).unwrap_err();
        assert!(matches!(err, EdgevalError::InvalidInput(_)));
    }
}
