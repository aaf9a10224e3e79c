use bucketview::codec::{extract_bucket_and_object, ResourceId};
use bucketview::Endpoint;
use proptest::prelude::*;

use crate::integration::support::codec;

proptest! {
    #[test]
    fn decode_inverts_encode(bucket in "[A-Za-z0-9.-]{1,24}", key in "[^\\x00]{0,64}") {
        let c = codec();
        let id = c.encode(&bucket, &key);
        prop_assert_eq!(c.decode(&id), (bucket, key));
    }

    #[test]
    fn encoding_is_stable(bucket in "[a-z0-9]{1,12}", key in "[a-z/ ]{0,20}") {
        let c = codec();
        prop_assert_eq!(c.encode(&bucket, &key), c.encode(&bucket, &key));
    }
}

#[test]
fn legacy_authority_segment_is_skipped() {
    let (bucket, key) = extract_bucket_and_object("s3://minio/localhost:9000/docs/img/logo.png");
    assert_eq!(bucket, "docs");
    assert_eq!(key, "img/logo.png");
}

#[test]
fn root_and_garbage_decode_to_empty() {
    assert_eq!(
        extract_bucket_and_object("s3://localhost:9000/"),
        (String::new(), String::new())
    );
    assert_eq!(
        extract_bucket_and_object("nonsense"),
        (String::new(), String::new())
    );
}

#[test]
fn new_encodings_never_take_the_legacy_shape() {
    let c = codec();
    let id = c.encode("docs", "a:b/c");
    let path = id.path().unwrap_or_default();
    let first = path.split('/').find(|s| !s.is_empty()).unwrap();
    assert!(!first.contains(':'));
    assert_eq!(c.decode(&id), ("docs".to_string(), "a:b/c".to_string()));
}

#[test]
fn authority_omits_default_ports() {
    assert_eq!(Endpoint::parse("http://minio:80").unwrap().authority(), "minio");
    assert_eq!(
        Endpoint::parse("https://minio:8443").unwrap().authority(),
        "minio:8443"
    );
    assert_eq!(
        ResourceId::from("s3://minio:8443/docs/").authority(),
        Some("minio:8443")
    );
}
