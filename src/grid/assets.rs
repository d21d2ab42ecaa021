//! Asset path mapping
//!
//! The feed stores paths relative to its storage root. The grid always
//! displays them under fixed mount prefixes so that the same record renders
//! the same source everywhere.

/// Shown whenever a record has no usable path
pub const PLACEHOLDER_SRC: &str = "/static/img/placeholder.svg";

/// Mount prefix for generated thumbnails
pub const THUMBNAIL_MOUNT: &str = "/storage/thumbnails/";

/// Mount prefix for original uploads
pub const UPLOADS_MOUNT: &str = "/uploads/";

const STATIC_MOUNT: &str = "/static/";

/// Mount path for a `thumbnail_path`. Always under `/storage/thumbnails/`.
/// Returns `None` for a missing or blank path.
pub fn thumbnail_src(path: Option<&str>) -> Option<String> {
    mount(path, THUMBNAIL_MOUNT, &["storage/", "thumbnails/"])
}

/// Mount path for an `original_path`. Always under `/uploads/`.
/// Returns `None` for a missing or blank path.
pub fn upload_src(path: Option<&str>) -> Option<String> {
    mount(path, UPLOADS_MOUNT, &["uploads/"])
}

/// Thumbnail mount path, or the placeholder if there is none
pub fn thumbnail_src_or_placeholder(path: Option<&str>) -> String {
    thumbnail_src(path).unwrap_or_else(|| PLACEHOLDER_SRC.to_string())
}

fn mount(path: Option<&str>, prefix: &str, roots: &[&str]) -> Option<String> {
    let raw = path?.trim();
    if raw.is_empty() {
        return None;
    }

    let path = raw.replace('\\', "/");

    if path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with(THUMBNAIL_MOUNT)
        || path.starts_with(UPLOADS_MOUNT)
        || path.starts_with(STATIC_MOUNT)
    {
        return Some(path);
    }

    // Only leading segments go; inner directories stay part of the key
    let mut rest = path.as_str();
    loop {
        let stripped = rest
            .strip_prefix("./")
            .or_else(|| rest.strip_prefix('/'))
            .or_else(|| roots.iter().find_map(|root| rest.strip_prefix(root)));
        match stripped {
            Some(next) => rest = next,
            None => break,
        }
    }

    Some(format!("{prefix}{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_uses_placeholder() {
        assert_eq!(thumbnail_src_or_placeholder(None), PLACEHOLDER_SRC);
        assert_eq!(thumbnail_src_or_placeholder(Some("   ")), PLACEHOLDER_SRC);
        assert_eq!(upload_src(Some("")), None);
    }

    #[test]
    fn test_thumbnails_always_use_storage_mount() {
        assert_eq!(
            thumbnail_src(Some("42_thumb.jpg")).as_deref(),
            Some("/storage/thumbnails/42_thumb.jpg")
        );
        assert_eq!(
            thumbnail_src(Some("thumbnails\\job1\\12.jpg")).as_deref(),
            Some("/storage/thumbnails/job1/12.jpg")
        );
        assert_eq!(
            thumbnail_src(Some("/storage/thumbnails/7.jpg")).as_deref(),
            Some("/storage/thumbnails/7.jpg")
        );
    }

    #[test]
    fn test_originals_always_use_uploads_mount() {
        assert_eq!(
            upload_src(Some("uploads/job1/IMG_1.JPG")).as_deref(),
            Some("/uploads/job1/IMG_1.JPG")
        );
        assert_eq!(
            upload_src(Some("./job1/IMG_1.JPG")).as_deref(),
            Some("/uploads/job1/IMG_1.JPG")
        );
        // A "thumbnails" folder inside the uploads is still an upload
        assert_eq!(
            upload_src(Some("trips/thumbnails/IMG_1.JPG")).as_deref(),
            Some("/uploads/trips/thumbnails/IMG_1.JPG")
        );
    }

    #[test]
    fn test_inner_directories_do_not_collide() {
        let a = thumbnail_src(Some("a/thumbnails/x.jpg"));
        let b = thumbnail_src(Some("b/thumbnails/x.jpg"));
        assert_ne!(a, b);
        assert_eq!(a.as_deref(), Some("/storage/thumbnails/a/thumbnails/x.jpg"));
    }

    #[test]
    fn test_mounted_and_remote_paths_are_kept() {
        for path in [
            "/uploads/a.jpg",
            "/storage/thumbnails/a.jpg",
            "/static/img/placeholder.svg",
            "https://example.org/a.jpg",
        ] {
            assert_eq!(thumbnail_src(Some(path)).as_deref(), Some(path));
            assert_eq!(upload_src(Some(path)).as_deref(), Some(path));
        }
    }
}
