//! Edit sessions: one parse → mutate → serialize cycle per file.
//!
//! A session never writes on failure. Parsing, wrapping the root, and the
//! mutation callback all happen before any byte reaches disk; the final
//! overwrite goes through a temporary file and an atomic rename.

use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::Result;
use crate::view::View;

/// Apply `mutate` to the document in `text` and return the re-serialized
/// output. A no-op callback returns the input byte-for-byte.
///
/// # Errors
/// Parse failures, traversal errors, and any error returned by the callback
/// abort the session; no output is produced.
pub fn edit_str<F>(text: &str, mutate: F) -> Result<String>
where
    F: FnOnce(&mut View<'_>) -> Result<()>,
{
    let mut document = Document::parse(text)?;
    let unit = document.indent_unit();
    let mut root = View::over(document.root_mut(), unit)?;
    mutate(&mut root)?;
    Ok(document.to_string())
}

/// Edit the document at `path` in place.
///
/// The file is read once, mutated in memory, and overwritten only after the
/// callback returned successfully: write to a temporary file in the same
/// directory, read it back as a sanity check, then rename over the original.
///
/// # Errors
/// Any failure between read and serialize leaves the on-disk file untouched.
pub fn edit_document<F>(path: &Path, mutate: F) -> Result<()>
where
    F: FnOnce(&mut View<'_>) -> Result<()>,
{
    let contents = fs::read_to_string(path)?;
    let output = edit_str(&contents, mutate)?;
    write_atomic(path, &output)
}

/// Run the same pipeline as [`edit_document`] but return the would-be output
/// instead of writing it.
///
/// # Errors
/// Same failure modes as [`edit_document`], minus the write.
pub fn edit_document_dry_run<F>(path: &Path, mutate: F) -> Result<String>
where
    F: FnOnce(&mut View<'_>) -> Result<()>,
{
    let contents = fs::read_to_string(path)?;
    edit_str(&contents, mutate)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    // temp file in the same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|ext| ext.to_str()).unwrap_or("")
    ));
    fs::write(&temp_path, contents)?;
    let _ = fs::read_to_string(&temp_path)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_edit_document_overwrites_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "version: 1.0.0\n").unwrap();

        edit_document(&path, |root| root.set("version", "2.0.0")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "version: 2.0.0\n");
        assert!(!temp_dir.path().join("config.yaml.tmp").exists());
    }

    #[test]
    fn test_callback_error_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "version: 1.0.0\n").unwrap();

        let result = edit_document(&path, |root| {
            root.set("version", "2.0.0")?;
            Err(Error::Other("abort".to_string()))
        });
        assert!(result.is_err());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "version: 1.0.0\n");
    }

    #[test]
    fn test_parse_error_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "# nothing but a comment\n").unwrap();

        let result = edit_document(&path, |_root| Ok(()));
        assert!(matches!(result, Err(Error::EmptyDocument)));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# nothing but a comment\n");
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "version: 1.0.0\n").unwrap();

        let output = edit_document_dry_run(&path, |root| root.set("version", "2.0.0")).unwrap();
        assert_eq!(output, "version: 2.0.0\n");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "version: 1.0.0\n");
    }
}
