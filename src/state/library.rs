use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::data::FileRecord;
use crate::error::{Result, ReviewError};

/// Image extensions picked up when scanning a folder
const IMAGE_EXTENSIONS: [&str; 10] = [
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "heic", "avif",
];

/// Where the file records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    /// JSON array exported by the review backend
    Export(PathBuf),
    /// Plain folder of images
    Folder(PathBuf),
}

/// The Library hands file records to the grid.
/// It never writes anything back; review state lives in the session.
#[derive(Debug, Clone)]
pub struct Library {
    source: LibrarySource,
    files: Vec<FileRecord>,
}

impl Library {
    /// Load records from a `.json` export or by scanning a folder
    pub fn open(path: &Path) -> Result<Self> {
        let source = if path.is_dir() {
            LibrarySource::Folder(path.to_path_buf())
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            LibrarySource::Export(path.to_path_buf())
        } else {
            return Err(ReviewError::UnsupportedSource(path.to_path_buf()));
        };

        let files = match &source {
            LibrarySource::Export(path) => Self::read_export(path)?,
            LibrarySource::Folder(path) => Self::scan_folder(path),
        };

        log::info!("📁 Loaded {} files from {}", files.len(), path.display());
        Ok(Library { source, files })
    }

    /// Same as `open`, off the UI thread
    pub async fn open_async(path: PathBuf) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::open(&path))
            .await
            .map_err(|e| ReviewError::Task(e.to_string()))?
    }

    pub fn source(&self) -> &LibrarySource {
        &self.source
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn into_files(self) -> Vec<FileRecord> {
        self.files
    }

    fn read_export(path: &Path) -> Result<Vec<FileRecord>> {
        let text = fs::read_to_string(path).map_err(|e| ReviewError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| ReviewError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every image below `root`, sorted by path, ids starting at 1
    fn scan_folder(root: &Path) -> Vec<FileRecord> {
        let mut paths: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_image(path))
            .collect();
        paths.sort();

        paths
            .iter()
            .enumerate()
            .filter_map(|(index, path)| {
                let relative = path.strip_prefix(root).ok()?;
                let relative = relative.to_string_lossy().replace('\\', "/");
                let filename = path.file_name()?.to_string_lossy().to_string();
                // No thumbnail tier on disk, grid tiles go to the original once large enough
                Some(FileRecord::new(index as u64 + 1, filename).with_original(relative))
            })
            .collect()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::FileId;

    #[test]
    fn test_open_export() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("files.json");
        fs::write(
            &export,
            r#"[
                {"id": 2, "original_filename": "b.jpg", "thumbnail_path": "thumbnails/2.jpg"},
                {"id": 1, "original_filename": "a.jpg", "discarded": true}
            ]"#,
        )
        .unwrap();

        let library = Library::open(&export).unwrap();
        let files = library.files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, FileId(2));
        assert!(files[1].discarded);
        assert_eq!(library.source(), &LibrarySource::Export(export.clone()));
    }

    #[test]
    fn test_open_broken_export() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("files.json");
        fs::write(&export, "{ not json").unwrap();

        assert!(matches!(Library::open(&export), Err(ReviewError::Json { .. })));
    }

    #[test]
    fn test_open_folder() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("day2")).unwrap();
        fs::write(root.join("b.JPG"), b"x").unwrap();
        fs::write(root.join("a.png"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();
        fs::write(root.join("day2").join("c.jpeg"), b"x").unwrap();

        let library = Library::open(root).unwrap();
        let names: Vec<&str> = library
            .files()
            .iter()
            .map(|f| f.original_filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.jpeg"]);

        let scanned = &library.files()[2];
        assert_eq!(scanned.original_path.as_deref(), Some("day2/c.jpeg"));
        assert_eq!(scanned.thumbnail_path, None);
        assert_eq!(library.files()[0].id, FileId(1));
        assert_eq!(library.source(), &LibrarySource::Folder(root.to_path_buf()));
    }

    #[test]
    fn test_unsupported_source() {
        let result = Library::open(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(ReviewError::UnsupportedSource(_))));
    }
}
