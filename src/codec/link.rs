//! Public object links for "copy link" and upload results.

use super::endpoint::Endpoint;
use super::{encode_key, encode_segment};

/// `http(s)://<host>[:<port>]/<bucket>/<percent-encoded key>`.
///
/// Leading separators on the key are dropped so a key never produces `//`
/// right after the bucket.
pub fn public_link(endpoint: &Endpoint, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        endpoint.base_url(),
        encode_segment(bucket),
        encode_key(key.trim_start_matches('/'))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_omits_default_port_and_escapes_key() {
        let ep = Endpoint::parse("https://cdn.example.com:443").unwrap();
        assert_eq!(
            public_link(&ep, "assets", "img/hello world.png"),
            "https://cdn.example.com/assets/img/hello%20world.png"
        );
    }

    #[test]
    fn test_link_keeps_custom_port() {
        let ep = Endpoint::parse("localhost:9000").unwrap();
        assert_eq!(
            public_link(&ep, "docs", "/uploads/a+b.txt"),
            "http://localhost:9000/docs/uploads/a%2Bb.txt"
        );
    }
}
