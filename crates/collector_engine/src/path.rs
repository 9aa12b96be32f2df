use std::fmt::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use url::Url;

/// Content-addressed slot for an image: `{dir}/{sha256(url)}.{extension}`.
///
/// The same URL always maps to the same path, across workers and runs.
pub fn destination_path(url: &Url, extension: &str, destination_dir: &Path) -> PathBuf {
    destination_dir.join(format!("{}.{extension}", url_digest(url)))
}

/// Lowercase hex SHA-256 of the canonical URL string.
pub fn url_digest(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_full_sha256_hex() {
        let url = Url::parse("http://a.test/x.png").unwrap();
        let digest = url_digest(&url);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hashes_the_serialized_url() {
        let url = Url::parse("http://example.com/").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
        assert_eq!(
            url_digest(&url),
            format!("{:x}", Sha256::digest(b"http://example.com/"))
        );
    }

    #[test]
    fn path_is_rooted_and_stable() {
        let url = Url::parse("https://a.test/photo.jpg?size=2").unwrap();
        let first = destination_path(&url, "jpeg", Path::new("/data"));
        let second = destination_path(&url, "jpeg", Path::new("/data"));
        assert_eq!(first, second);
        assert_eq!(first.parent(), Some(Path::new("/data")));
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("jpeg"));
    }
}
