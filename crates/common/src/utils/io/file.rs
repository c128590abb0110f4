use std::{fs, path::Path};

use eyre::{eyre, Result};

/// Write contents to a file on the disc, creating parent directories as needed.
///
/// ```no_run
/// use mimir_common::utils::io::file::write_file;
///
/// let result = write_file("/tmp/mimir/config.toml", "timeout_ms = 1000");
/// ```
pub fn write_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();

    // Create the directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| eyre!("unable to create directory {}: {e}", parent.display()))?;
    }

    fs::write(path, contents).map_err(|e| eyre!("unable to write {}: {e}", path.display()))
}

/// Read contents from a file on the disc
///
/// ```no_run
/// use mimir_common::utils::io::file::read_file;
///
/// let contents = read_file("/tmp/mimir/fixture.json");
/// ```
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| eyre!("unable to read {}: {e}", path.display()))
}

/// Delete a file from the disc. Missing files are not an error.
pub fn delete_file(path: impl AsRef<Path>) -> Result<()> {
    match fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(eyre!("unable to delete {}: {e}", path.as_ref().display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mimir-file-tests-{}", std::process::id())).join(name)
    }

    #[test]
    fn test_write_then_read_file() {
        let path = scratch("nested/dir/test.txt");
        write_file(&path, "Hello, World!").expect("unable to write file");

        assert_eq!(read_file(&path).expect("unable to read file"), "Hello, World!");
        delete_file(&path).expect("unable to delete file");
    }

    #[test]
    fn test_read_file_failure() {
        assert!(read_file("/nonexistent/mimir/test.txt").is_err());
    }

    #[test]
    fn test_delete_missing_file() {
        assert!(delete_file(scratch("never-written.txt")).is_ok());
    }
}
