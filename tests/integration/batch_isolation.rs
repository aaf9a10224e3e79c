use bucketview::store::StoreOp;
use bucketview::{Endpoint, MemoryObjectStore, ResourceCodec, TransferService};
use std::sync::Arc;

use crate::integration::support::{codec, store_with};

fn transfer(store: Arc<MemoryObjectStore>) -> TransferService {
    let endpoint = Endpoint::parse("http://localhost:9000").unwrap();
    let codec = ResourceCodec::for_endpoint(&endpoint, "s3");
    TransferService::new(store, endpoint, codec)
}

#[tokio::test]
async fn one_failed_delete_does_not_abort_the_batch() {
    let store = store_with(&[
        ("docs", "one.txt"),
        ("docs", "two.txt"),
        ("docs", "three.txt"),
    ]);
    store.fail_on(StoreOp::Remove, "docs", "two.txt", "AccessDenied: two.txt is locked");
    let svc = transfer(store.clone());
    let c = codec();

    let report = svc
        .delete_many(vec![
            c.encode("docs", "one.txt"),
            c.encode("docs", "two.txt"),
            c.encode("docs", "three.txt"),
        ])
        .await;

    assert_eq!(report.success_count, 2);
    assert_eq!(report.fail_count, 1);
    assert!(!store.contains("docs", "one.txt"));
    assert!(store.contains("docs", "two.txt"));
    assert!(!store.contains("docs", "three.txt"));
    assert!(report.failures[0]
        .message
        .contains("AccessDenied: two.txt is locked"));
}

#[tokio::test]
async fn invalid_identifiers_fail_only_their_item() {
    let store = store_with(&[("docs", "keep.txt"), ("docs", "drop.txt")]);
    let svc = transfer(store.clone()).with_concurrency(1);
    let c = codec();

    let report = svc
        .delete_many(vec![
            "not an identifier".into(),
            c.encode("docs", "drop.txt"),
            c.encode("docs", "folder/"),
        ])
        .await;

    assert_eq!((report.success_count, report.fail_count), (1, 2));
    assert_eq!(report.failures[0].kind, "invalid_resource");
    assert_eq!(report.failures[1].kind, "precondition");
    assert!(store.contains("docs", "keep.txt"));
    assert!(!store.contains("docs", "drop.txt"));
}

#[tokio::test]
async fn batch_download_writes_each_object() {
    let store = store_with(&[("docs", "a.txt"), ("docs", "nested/b.txt")]);
    let svc = transfer(store);
    let c = codec();
    let dir = tempfile::tempdir().unwrap();

    let report = svc
        .download_many(
            vec![
                c.encode("docs", "a.txt"),
                c.encode("docs", "nested/b.txt"),
                c.encode("docs", "missing.txt"),
            ],
            dir.path(),
        )
        .await;

    assert_eq!((report.success_count, report.fail_count), (2, 1));
    assert_eq!(report.failures[0].kind, "not_found");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("b.txt")).unwrap(),
        "body of nested/b.txt"
    );
    assert!(!dir.path().join("missing.txt").exists());
}

#[tokio::test]
async fn batch_upload_places_files_under_sub_directory() {
    let store = Arc::new(MemoryObjectStore::new());
    store.create_bucket("uploads");
    let svc = transfer(store.clone());
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.png");
    std::fs::write(&first, "{}").unwrap();
    std::fs::write(&second, [0x89, b'P', b'N', b'G']).unwrap();

    let report = svc
        .upload_many(
            vec![first, second, dir.path().join("absent.txt")],
            "uploads",
            "incoming/",
        )
        .await;

    assert_eq!((report.success_count, report.fail_count), (2, 1));
    assert_eq!(
        store.keys("uploads"),
        vec!["incoming/first.json", "incoming/second.png"]
    );
    assert_eq!(
        store.content_type("uploads", "incoming/first.json").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn colliding_base_names_are_rejected_not_overwritten() {
    let store = Arc::new(MemoryObjectStore::new());
    store.insert("docs", "a/report.txt", "AA-from-a");
    store.insert("docs", "b/report.txt", "BB-from-b");
    store.insert("docs", "c/summary.txt", "CC-from-c");
    let svc = transfer(store);
    let c = codec();
    let dir = tempfile::tempdir().unwrap();

    let report = svc
        .download_many(
            vec![
                c.encode("docs", "a/report.txt"),
                c.encode("docs", "b/report.txt"),
                c.encode("docs", "c/summary.txt"),
            ],
            dir.path(),
        )
        .await;

    assert_eq!((report.success_count, report.fail_count), (1, 2));
    assert!(report.failures.iter().all(|f| f.kind == "precondition"));
    assert!(report.failures[0].message.contains("report.txt"));

    let mut files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["summary.txt"]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("summary.txt")).unwrap(),
        "CC-from-c"
    );
}
