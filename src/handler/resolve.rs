//! Path resolution module
//!
//! Maps a request URI path onto a filesystem path below the configured root.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Join `root` with the percent-decoded request path
///
/// The path is normalised lexically: empty and `.` segments are dropped and
/// `..` removes the previous segment, never climbing above `root`. Both `/`
/// and `\` separate segments. The query string must already be stripped.
///
/// # Examples
/// ```
/// use basic_static::handler::resolve::resolve_path;
/// use std::path::Path;
///
/// let root = Path::new("/srv/www");
/// assert_eq!(resolve_path(root, "/css/site%20main.css"), Path::new("/srv/www/css/site main.css"));
/// assert_eq!(resolve_path(root, "/../../etc/passwd"), Path::new("/srv/www/etc/passwd"));
/// ```
pub fn resolve_path(root: &Path, uri_path: &str) -> PathBuf {
    let decoded = percent_decode_str(uri_path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}
