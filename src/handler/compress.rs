//! Pre-compressed variant selection
//!
//! Prefers a gzip sibling (`<file>.gz`) generated ahead of time.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix of the pre-compressed sibling
pub const GZIP_SUFFIX: &str = ".gz";

/// `Content-Encoding` value for a gzip sibling
pub const GZIP_ENCODING: &str = "gzip";

/// The file chosen to answer a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub path: PathBuf,
    /// `Content-Encoding` to announce, `None` for the original file
    pub encoding: Option<&'static str>,
}

impl Variant {
    pub const fn identity(path: PathBuf) -> Self {
        Self {
            path,
            encoding: None,
        }
    }
}

/// Path of the gzip sibling of `base`
pub fn gzip_sibling(base: &Path) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(GZIP_SUFFIX);
    PathBuf::from(name)
}

/// Pick the gzip sibling of `base` if it is a regular file
///
/// Failures while probing the sibling are swallowed and the original path
/// is returned.
pub async fn select_variant(base: &Path) -> Variant {
    let gz = gzip_sibling(base);
    match fs::metadata(&gz).await {
        Ok(metadata) if metadata.is_file() => Variant {
            path: gz,
            encoding: Some(GZIP_ENCODING),
        },
        _ => Variant::identity(base.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[test]
    fn test_gzip_sibling() {
        assert_eq!(
            gzip_sibling(Path::new("/srv/main.js")),
            Path::new("/srv/main.js.gz")
        );
    }

    #[tokio::test]
    async fn test_prefers_existing_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("main.js");
        std_fs::write(&base, "plain").unwrap();
        std_fs::write(dir.path().join("main.js.gz"), [0x1f, 0x8b]).unwrap();

        let variant = select_variant(&base).await;
        assert_eq!(variant.path, dir.path().join("main.js.gz"));
        assert_eq!(variant.encoding, Some("gzip"));
    }

    #[tokio::test]
    async fn test_falls_back_without_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("styles.css");
        std_fs::write(&base, "body{}").unwrap();

        assert_eq!(select_variant(&base).await, Variant::identity(base));
    }

    #[tokio::test]
    async fn test_ignores_directory_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("odd");
        std_fs::create_dir(dir.path().join("odd.gz")).unwrap();

        assert_eq!(select_variant(&base).await, Variant::identity(base));
    }

    #[tokio::test]
    async fn test_missing_base_still_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("missing").join("deep.js");

        assert_eq!(select_variant(&base).await, Variant::identity(base));
    }
}
