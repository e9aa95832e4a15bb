use std::path::Path;
use tracing::debug;

use crate::{
    error::{DiscoveryError, Result},
    media::types::{MediaFile, MediaKind},
};

/// List the files of the given kind directly inside `directory`.
///
/// The result is sorted by path so repeated runs over the same directory
/// see the same order. A missing directory is not an error: it simply has
/// nothing to offer, and the caller decides whether that is fatal.
///
/// # Example
///
/// ```rust,no_run
/// use lipsync_batch::media::{discover, MediaKind};
///
/// # fn main() -> lipsync_batch::Result<()> {
/// let videos = discover("data/Video", MediaKind::Video)?;
/// for video in &videos {
///     println!("  - {}", video.file_name());
/// }
/// # Ok(())
/// # }
/// ```
pub fn discover<P: AsRef<Path>>(directory: P, kind: MediaKind) -> Result<Vec<MediaFile>> {
    let directory = directory.as_ref();

    if !directory.is_dir() {
        debug!("{} directory {:?} does not exist, nothing to discover", kind.label(), directory);
        return Ok(Vec::new());
    }

    let read_failed = |e: std::io::Error| DiscoveryError::ReadFailed {
        path: directory.display().to_string(),
        reason: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_failed)? {
        let path = entry.map_err(read_failed)?.path();

        if path.is_file() && kind.matches(&path) {
            files.push(MediaFile::new(path));
        }
    }

    files.sort();
    debug!("Discovered {} {} files in {:?}", files.len(), kind.label(), directory);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = tempdir().unwrap();
        let files = discover(temp_dir.path().join("absent"), MediaKind::Video).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let files = discover(temp_dir.path(), MediaKind::Audio).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_only_matching_files_sorted() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        touch(dir, "c.mp4");
        touch(dir, "a.mp4");
        touch(dir, "b.mp4");
        touch(dir, "notes.txt");
        touch(dir, "track.wav");
        touch(dir, "upper.MP4");
        std::fs::create_dir(dir.join("nested.mp4")).unwrap();

        let files = discover(dir, MediaKind::Video).unwrap();
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4", "c.mp4"]);

        let audio = discover(dir, MediaKind::Audio).unwrap();
        assert_eq!(audio.len(), 1);
        assert_eq!(audio[0].stem(), "track");
    }

    #[test]
    fn test_subdirectories_not_searched() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("inner");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.wav");

        let files = discover(temp_dir.path(), MediaKind::Audio).unwrap();
        assert!(files.is_empty());
    }
}
