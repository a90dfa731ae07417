//! Atomic file operations for sync.
//!
//! Output files are replaced, never patched in place:
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - A failed write leaves the previous file (if any) untouched

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file next to the target (`<name>.tmp`)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails, or if the path has no
/// file name component.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = temp_path_for(path)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write to temp file
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        // Sync to disk before rename
        writer.get_ref().sync_all()?;
    }

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Temp file path next to the target: `page.md` writes through `page.md.tmp`.
fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    match path.file_name() {
        Some(name) => {
            let mut temp = name.to_os_string();
            temp.push(".tmp");
            Ok(path.with_file_name(temp))
        }
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot write to {}: no file name", path.display()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.md");

        atomic_write(&path, "line 1\nline 2\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "line 1\nline 2\n");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.md");

        atomic_write(&path, "old\n").unwrap();
        atomic_write(&path, "new\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "new\n");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deep").join("page.md");

        atomic_write(&path, "content\n").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.md");

        atomic_write(&path, "content\n").unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page.md".to_string()]);
    }

    #[test]
    fn test_temp_path_sits_next_to_target() {
        let temp = temp_path_for(Path::new("/out/page.md")).unwrap();
        assert_eq!(temp, PathBuf::from("/out/page.md.tmp"));
    }
}
