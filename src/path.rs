//! Request-path decoding and traversal-safe resolution

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// A request path resolved beneath the base directory
pub(crate) struct Resolved {
    /// Filesystem location the request names
    pub(crate) full_path: PathBuf,
    /// Normalized, decoded form of the request path, for titles and links
    pub(crate) url_path: String,
}

/// Percent-decodes `raw` and resolves it beneath `root`.
///
/// Empty and `.` segments are dropped, and `..` pops the previous segment
/// without ever ascending above `root`, so the result cannot name anything
/// outside the base directory.  Returns `None` when the path does not decode
/// to UTF-8 or embeds a NUL byte; callers answer those requests with `400`.
pub(crate) fn resolve(root: &Path, raw: &str) -> Option<Resolved> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut full_path = root.to_path_buf();
    for segment in &segments {
        full_path.push(segment);
    }

    let mut url_path = String::from("/");
    url_path.push_str(&segments.join("/"));
    if decoded.ends_with('/') && !segments.is_empty() {
        url_path.push('/');
    }

    Some(Resolved {
        full_path,
        url_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segments_resolve_beneath_root() {
        let resolved = resolve(Path::new("/srv"), "/css/style.css").unwrap();
        assert_eq!(resolved.full_path, Path::new("/srv/css/style.css"));
        assert_eq!(resolved.url_path, "/css/style.css");
    }

    #[test]
    fn percent_escapes_decode() {
        let resolved = resolve(Path::new("/srv"), "/hello%20world.txt").unwrap();
        assert_eq!(resolved.full_path, Path::new("/srv/hello world.txt"));
        assert_eq!(resolved.url_path, "/hello world.txt");
    }

    #[test]
    fn parent_segments_never_escape_root() {
        let resolved = resolve(Path::new("/srv"), "/../../etc/passwd").unwrap();
        assert_eq!(resolved.full_path, Path::new("/srv/etc/passwd"));

        let resolved = resolve(Path::new("/srv"), "/css/../../../etc/passwd").unwrap();
        assert_eq!(resolved.full_path, Path::new("/srv/etc/passwd"));
        assert!(resolved.full_path.starts_with("/srv"));
    }

    #[test]
    fn encoded_parent_segments_never_escape_root() {
        let resolved = resolve(Path::new("/srv"), "/%2e%2e/%2e%2e/secret.txt").unwrap();
        assert_eq!(resolved.full_path, Path::new("/srv/secret.txt"));
    }

    #[test]
    fn dot_and_empty_segments_collapse() {
        let resolved = resolve(Path::new("/srv"), "//a/./b//c").unwrap();
        assert_eq!(resolved.full_path, Path::new("/srv/a/b/c"));
        assert_eq!(resolved.url_path, "/a/b/c");
    }

    #[test]
    fn trailing_slash_is_preserved() {
        assert_eq!(resolve(Path::new("/srv"), "/sub/").unwrap().url_path, "/sub/");
        assert_eq!(resolve(Path::new("/srv"), "/").unwrap().url_path, "/");
        assert_eq!(resolve(Path::new("/srv"), "/..").unwrap().url_path, "/");
    }

    #[test]
    fn nul_bytes_are_rejected() {
        assert!(resolve(Path::new("/srv"), "/index.html%00").is_none());
    }

    #[test]
    fn undecodable_escapes_are_rejected() {
        assert!(resolve(Path::new("/srv"), "/%ff%fe").is_none());
    }
}
