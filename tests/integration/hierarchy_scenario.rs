use bucketview::{ListEntry, Node, NodeKind, ObjectStoreClient};
use futures::TryStreamExt;
use std::collections::HashSet;

use crate::integration::support::{codec, resolver, store_with, summary};

#[tokio::test]
async fn bucket_and_folder_expansion() {
    let store = store_with(&[("docs", "readme.txt"), ("docs", "img/logo.png")]);
    let r = resolver(store);
    let c = codec();

    let bucket = Node::bucket(&c, "docs");
    let children = r.get_children(Some(&bucket)).await.unwrap();
    assert_eq!(
        summary(&children),
        vec![
            ("img".to_string(), NodeKind::Folder),
            ("readme.txt".to_string(), NodeKind::File)
        ]
    );

    let folder = children[0].clone();
    assert_eq!(folder.resource_id, c.encode("docs", "img/"));
    let nested = r.get_children(Some(&folder)).await.unwrap();
    assert_eq!(summary(&nested), vec![("logo.png".to_string(), NodeKind::File)]);
    assert_eq!(nested[0].resource_id, c.encode("docs", "img/logo.png"));

    let body = r.read_content(&nested[0]).await.unwrap();
    assert_eq!(&body[..], b"body of img/logo.png");
}

#[tokio::test]
async fn photos_prefix_keeps_depth_and_skips_itself() {
    let store = store_with(&[
        ("media", "photos/"),
        ("media", "photos/a.png"),
        ("media", "photos/2024/b.png"),
        ("media", "photos/2024/c.png"),
    ]);
    let r = resolver(store);
    let children = r.list_prefix("media", "photos/").await.unwrap();
    assert_eq!(
        summary(&children),
        vec![
            ("2024".to_string(), NodeKind::Folder),
            ("a.png".to_string(), NodeKind::File)
        ]
    );
    let own = codec().encode("media", "photos/");
    assert!(children.iter().all(|n| n.resource_id != own));
}

#[tokio::test]
async fn children_never_repeat_label_and_kind() {
    let store = store_with(&[
        ("b", "x"),
        ("b", "x/"),
        ("b", "x/inner"),
        ("b", "y/1"),
        ("b", "y/2"),
        ("b", "z"),
    ]);
    let children = resolver(store).list_prefix("b", "").await.unwrap();
    let unique: HashSet<_> = summary(&children).into_iter().collect();
    assert_eq!(unique.len(), children.len());
    assert_eq!(
        summary(&children),
        vec![
            ("x".to_string(), NodeKind::Folder),
            ("y".to_string(), NodeKind::Folder),
            ("x".to_string(), NodeKind::File),
            ("z".to_string(), NodeKind::File)
        ]
    );
}

#[tokio::test]
async fn recursive_listing_groups_to_the_same_children() {
    let store = store_with(&[
        ("docs", "readme.txt"),
        ("docs", "img/logo.png"),
        ("docs", "img/a/b.png"),
    ]);
    let entries: Vec<ListEntry> = store
        .list_objects("docs", "", true)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert!(entries
        .iter()
        .all(|e| matches!(e, ListEntry::Object { .. })));

    let grouped = bucketview::tree::group_listing(&codec(), "docs", "", entries);
    let resolved = resolver(store).list_prefix("docs", "").await.unwrap();
    assert_eq!(grouped, resolved);
}

#[tokio::test]
async fn expansions_reflect_store_changes() {
    let store = store_with(&[("docs", "a.txt")]);
    let r = resolver(store.clone());
    let bucket = Node::bucket(r.codec(), "docs");
    assert_eq!(r.get_children(Some(&bucket)).await.unwrap().len(), 1);

    store.insert("docs", "b.txt", "b");
    let (first, second) = tokio::join!(r.get_children(Some(&bucket)), r.list_prefix("docs", ""));
    assert_eq!(first.unwrap().len(), 2);
    assert_eq!(second.unwrap().len(), 2);
}

#[tokio::test]
async fn missing_bucket_fails_only_that_expansion() {
    let store = store_with(&[("docs", "a.txt")]);
    let r = resolver(store);
    let ghost = Node::bucket(r.codec(), "ghost");
    let err = r.get_children(Some(&ghost)).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert!(err.to_string().contains("NoSuchBucket: ghost"));

    let docs = Node::bucket(r.codec(), "docs");
    assert_eq!(r.get_children(Some(&docs)).await.unwrap().len(), 1);
}
