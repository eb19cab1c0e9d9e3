//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling.

use md5::{Digest, Md5};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate an `ETag` from a file's identity and modification time
///
/// The tag only depends on `(file_id, modified)`, so it is stable across
/// requests and restarts for an unchanged file.
///
/// # Arguments
/// * `file_id` - Unique file identifier (inode on Unix)
/// * `modified` - File modification time
///
/// # Returns
/// Quoted hex MD5 digest, e.g. `"9e107d9d372bb6826bd81d3542a419d6"`
pub fn generate_etag(file_id: u64, modified: SystemTime) -> String {
    let input = format!("{file_id}{}", epoch_millis(modified));
    let digest = Md5::digest(input.as_bytes());
    format!("\"{}\"", hex::encode(digest))
}

/// Milliseconds since the Unix epoch, negative for earlier times
fn epoch_millis(time: SystemTime) -> i128 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i128::try_from(after.as_millis()).unwrap_or(i128::MAX),
        Err(before) => -i128::try_from(before.duration().as_millis()).unwrap_or(i128::MAX),
    }
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Strict string equality against the whole header value. Weak validators,
/// tag lists and `*` are not interpreted.
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| client_etag == etag)
}

/// `Cache-Control` sent when none is configured (24 hours)
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=86400";

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(42, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        // 32 hex chars + 2 quotes
        assert_eq!(etag.len(), 34);
    }

    #[test]
    fn test_etag_matches_md5_of_id_and_millis() {
        // md5("1231500") where 1500 is the mtime in milliseconds
        let etag = generate_etag(123, UNIX_EPOCH + Duration::from_millis(1500));
        let expected = format!("\"{}\"", hex::encode(Md5::digest(b"1231500")));
        assert_eq!(etag, expected);
    }

    #[test]
    fn test_etag_consistency() {
        let mtime = UNIX_EPOCH + Duration::from_millis(1_234_567);
        assert_eq!(generate_etag(7, mtime), generate_etag(7, mtime));
    }

    #[test]
    fn test_etag_difference() {
        let mtime = UNIX_EPOCH + Duration::from_millis(1_234_567);
        let later = mtime + Duration::from_millis(1);
        assert_ne!(generate_etag(7, mtime), generate_etag(7, later));
        assert_ne!(generate_etag(7, mtime), generate_etag(8, mtime));
    }

    #[test]
    fn test_pre_epoch_mtime() {
        let before = UNIX_EPOCH - Duration::from_millis(5);
        assert_eq!(epoch_millis(before), -5);
        assert_ne!(generate_etag(1, before), generate_etag(1, UNIX_EPOCH + Duration::from_millis(5)));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(!check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(!check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("W/\"abc123\""), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
