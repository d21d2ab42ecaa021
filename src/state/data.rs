/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the file feed (the backend export or a scanned folder) and the grid.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique identifier of a file record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FileId {
    fn from(value: u64) -> Self {
        FileId(value)
    }
}

/// Represents a single file in a review session
///
/// The feed owns these records; the grid only keeps a locally merged copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique ID assigned by the feed
    pub id: FileId,
    /// Filename as uploaded (e.g., "IMG_0001.JPG")
    #[serde(default)]
    pub original_filename: String,
    /// Server-relative path of the small preview (None if not generated yet)
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    /// Server-relative path of the original upload
    #[serde(default)]
    pub original_path: Option<String>,
    /// Marked for removal during review
    #[serde(default)]
    pub discarded: bool,
    /// When the file was last reviewed
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Exact duplicate of another file
    #[serde(default)]
    pub is_duplicate: bool,
    /// Perceptually similar to another file
    #[serde(default)]
    pub is_similar: bool,
    /// Group shared by all similar files
    #[serde(default)]
    pub similar_group_id: Option<u64>,
}

impl FileRecord {
    /// Create a bare record with only the required fields set
    pub fn new(id: u64, original_filename: impl Into<String>) -> Self {
        Self {
            id: FileId(id),
            original_filename: original_filename.into(),
            thumbnail_path: None,
            original_path: None,
            discarded: false,
            reviewed_at: None,
            is_duplicate: false,
            is_similar: false,
            similar_group_id: None,
        }
    }

    pub fn with_thumbnail(mut self, path: impl Into<String>) -> Self {
        self.thumbnail_path = Some(path.into());
        self
    }

    pub fn with_original(mut self, path: impl Into<String>) -> Self {
        self.original_path = Some(path.into());
        self
    }

    /// Merge a partial update into this record.
    /// Fields the patch leaves as `None` are preserved.
    pub fn apply(&mut self, patch: &FilePatch) {
        if let Some(name) = &patch.original_filename {
            self.original_filename = name.clone();
        }
        if let Some(path) = &patch.thumbnail_path {
            self.thumbnail_path = path.clone();
        }
        if let Some(path) = &patch.original_path {
            self.original_path = path.clone();
        }
        if let Some(discarded) = patch.discarded {
            self.discarded = discarded;
        }
        if let Some(reviewed_at) = patch.reviewed_at {
            self.reviewed_at = reviewed_at;
        }
        if let Some(is_duplicate) = patch.is_duplicate {
            self.is_duplicate = is_duplicate;
        }
        if let Some(is_similar) = patch.is_similar {
            self.is_similar = is_similar;
        }
        if let Some(group) = patch.similar_group_id {
            self.similar_group_id = group;
        }
    }
}

/// Partial update for a known record
///
/// Double options clear a field with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePatch {
    pub id: FileId,
    pub original_filename: Option<String>,
    pub thumbnail_path: Option<Option<String>>,
    pub original_path: Option<Option<String>>,
    pub discarded: Option<bool>,
    pub reviewed_at: Option<Option<DateTime<Utc>>>,
    pub is_duplicate: Option<bool>,
    pub is_similar: Option<bool>,
    pub similar_group_id: Option<Option<u64>>,
}

impl FilePatch {
    pub fn new(id: FileId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn discarded(mut self, discarded: bool) -> Self {
        self.discarded = Some(discarded);
        self
    }

    pub fn reviewed_at(mut self, reviewed_at: Option<DateTime<Utc>>) -> Self {
        self.reviewed_at = Some(reviewed_at);
        self
    }

    pub fn thumbnail_path(mut self, path: Option<String>) -> Self {
        self.thumbnail_path = Some(path);
        self
    }

    pub fn original_path(mut self, path: Option<String>) -> Self {
        self.original_path = Some(path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": 42,
            "original_filename": "IMG_0042.JPG",
            "thumbnail_path": "thumbnails/42.jpg",
            "reviewed_at": "2024-05-01T10:00:00Z",
            "is_similar": true,
            "similar_group_id": 7
        }"#;

        let record: FileRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, FileId(42));
        assert_eq!(record.thumbnail_path.as_deref(), Some("thumbnails/42.jpg"));
        assert!(record.original_path.is_none());
        assert!(!record.discarded);
        assert!(record.reviewed_at.is_some());
        assert!(record.is_similar);
        assert_eq!(record.similar_group_id, Some(7));
    }

    #[test]
    fn test_patch_preserves_unspecified_fields() {
        let mut record = FileRecord::new(1, "a.jpg").with_thumbnail("thumbnails/a.jpg");

        record.apply(&FilePatch::new(FileId(1)).discarded(true));

        assert!(record.discarded);
        assert_eq!(record.original_filename, "a.jpg");
        assert_eq!(record.thumbnail_path.as_deref(), Some("thumbnails/a.jpg"));
    }

    #[test]
    fn test_patch_can_clear_optional_field() {
        let mut record = FileRecord::new(1, "a.jpg").with_original("uploads/a.jpg");

        record.apply(&FilePatch::new(FileId(1)).original_path(None));

        assert!(record.original_path.is_none());
    }
}
