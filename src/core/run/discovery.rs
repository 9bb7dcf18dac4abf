//! Input discovery
//!
//! Resolves the command-line input into the list of log files to process and
//! the output path each one is written to.

use crate::domain::{Result, ScrubError};
use std::path::{Path, PathBuf};

/// Where the logs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A single log file
    File(PathBuf),
    /// A directory walked recursively for files with the configured extension
    Directory(PathBuf),
}

impl InputSource {
    /// Path given on the command line
    pub fn path(&self) -> &Path {
        match self {
            InputSource::File(path) | InputSource::Directory(path) => path,
        }
    }
}

/// One file to anonymize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Source path
    pub input: PathBuf,
    /// Destination path
    pub output: PathBuf,
    /// Size of the source in bytes
    pub size: u64,
}

impl LogFile {
    /// Size in megabytes, for progress output
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// Resolve `source` into files and their output paths under `output_dir`
///
/// Single files keep their name; directory inputs mirror their relative layout.
/// Results are sorted by input path.
///
/// # Errors
///
/// Returns [`ScrubError::InputUnavailable`] if the input is missing, of the
/// wrong kind, or cannot be listed.
pub fn discover(source: &InputSource, output_dir: &Path, extension: &str) -> Result<Vec<LogFile>> {
    match source {
        InputSource::File(path) => {
            let metadata = std::fs::metadata(path).map_err(|e| ScrubError::input(path, e))?;
            if !metadata.is_file() {
                return Err(ScrubError::input(path, "not a regular file"));
            }
            let name = path
                .file_name()
                .ok_or_else(|| ScrubError::input(path, "path has no file name"))?;

            Ok(vec![LogFile {
                input: path.clone(),
                output: output_dir.join(name),
                size: metadata.len(),
            }])
        }
        InputSource::Directory(root) => {
            if !root.is_dir() {
                return Err(ScrubError::input(root, "not a directory"));
            }

            let mut files = Vec::new();
            walk(root, root, output_dir, extension, &mut files)?;
            files.sort_by(|a, b| a.input.cmp(&b.input));

            tracing::debug!(root = %root.display(), count = files.len(), "Discovered log files");
            Ok(files)
        }
    }
}

fn walk(
    root: &Path,
    dir: &Path,
    output_dir: &Path,
    extension: &str,
    files: &mut Vec<LogFile>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScrubError::input(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ScrubError::input(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ScrubError::input(&path, e))?;

        if file_type.is_dir() {
            // Earlier output nested inside the input tree is not input
            if path != root && path.starts_with(output_dir) && output_dir != root {
                continue;
            }
            walk(root, &path, output_dir, extension, files)?;
        } else if file_type.is_file() && has_extension(&path, extension) {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(LogFile {
                output: output_dir.join(relative),
                input: path,
                size,
            });
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_single_file_output_keeps_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Job.Backup.log");
        std::fs::write(&input, "content").unwrap();

        let files = discover(&InputSource::File(input.clone()), Path::new("/out"), "log").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].input, input);
        assert_eq!(files[0].output, PathBuf::from("/out/Job.Backup.log"));
        assert_eq!(files[0].size, 7);
    }

    #[test]
    fn test_directory_walk_mirrors_layout() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("logs");
        std::fs::create_dir_all(root.join("Backup").join("Job1")).unwrap();
        std::fs::write(root.join("Svc.log"), "a").unwrap();
        std::fs::write(root.join("Backup").join("Job1").join("Task.LOG"), "b").unwrap();
        std::fs::write(root.join("Backup").join("notes.txt"), "c").unwrap();

        let out = dir.path().join("out");
        let files = discover(&InputSource::Directory(root.clone()), &out, "log").unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].output, out.join("Backup").join("Job1").join("Task.LOG"));
        assert_eq!(files[1].output, out.join("Svc.log"));
    }

    #[test]
    fn test_nested_output_directory_is_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let out = root.join("scrubbed");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(root.join("a.log"), "a").unwrap();
        std::fs::write(out.join("a.log"), "old").unwrap();

        let files = discover(&InputSource::Directory(root.clone()), &out, "log").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].input, root.join("a.log"));
    }

    #[test]
    fn test_missing_input_is_unavailable() {
        let result = discover(
            &InputSource::File(PathBuf::from("/nonexistent/x.log")),
            Path::new("/out"),
            "log",
        );
        assert!(matches!(result, Err(ScrubError::InputUnavailable { .. })));

        let dir = tempdir().unwrap();
        let result = discover(
            &InputSource::Directory(dir.path().join("missing")),
            Path::new("/out"),
            "log",
        );
        assert!(matches!(result, Err(ScrubError::InputUnavailable { .. })));
    }
}
