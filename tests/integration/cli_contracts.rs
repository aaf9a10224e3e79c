use bucketview::config::BucketviewConfig;
use bucketview::tooling::cli::{CliContext, Commands, OutputFormat};
use std::path::PathBuf;

use crate::integration::support::store_with;

fn context_with(config: BucketviewConfig) -> (CliContext, std::sync::Arc<bucketview::MemoryObjectStore>) {
    let store = store_with(&[("docs", "readme.txt"), ("docs", "img/logo.png"), ("media", "a.mp4")]);
    let ctx = CliContext::with_client(store.clone(), config).unwrap();
    (ctx, store)
}

fn local_config() -> BucketviewConfig {
    let mut config = BucketviewConfig::default();
    config.store.endpoint = "http://localhost:9000".to_string();
    config
}

#[tokio::test]
async fn buckets_json_contract() {
    let (ctx, _) = context_with(local_config());
    let ctx = ctx.with_format(OutputFormat::Json);
    let out = ctx.execute(&Commands::Buckets).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out.rendered).unwrap();
    let buckets = parsed.as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    for bucket in buckets {
        assert_eq!(bucket["kind"], "bucket");
        assert!(bucket["resource_id"].as_str().unwrap().ends_with('/'));
        assert!(bucket.get("label").and_then(|v| v.as_str()).is_some());
    }
}

#[tokio::test]
async fn default_bucket_changes_the_root() {
    let mut config = local_config();
    config.browse.default_bucket = Some("docs".to_string());
    let (ctx, _) = context_with(config);
    let out = ctx
        .with_format(OutputFormat::Json)
        .execute(&Commands::Ls { target: None })
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out.rendered).unwrap();
    let labels: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["img", "readme.txt"]);
}

#[tokio::test]
async fn link_uses_https_without_default_port() {
    let mut config = local_config();
    config.store.endpoint = "https://files.example.com:443".to_string();
    let (ctx, _) = context_with(config);
    let out = ctx
        .execute(&Commands::Link {
            target: "docs/img/logo.png".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(out.rendered, "https://files.example.com/docs/img/logo.png");
}

#[tokio::test]
async fn single_upload_json_contract() {
    let mut config = local_config();
    config.transfer.bucket = Some("media".to_string());
    config.transfer.sub_directory = "clips".to_string();
    let (ctx, store) = context_with(config);
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("intro.txt");
    std::fs::write(&file, "intro").unwrap();

    let out = ctx
        .with_format(OutputFormat::Json)
        .execute(&Commands::Upload {
            files: vec![file],
            bucket: None,
            dir: None,
        })
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out.rendered).unwrap();
    assert_eq!(parsed["bucket"], "media");
    assert_eq!(parsed["key"], "clips/intro.txt");
    assert_eq!(parsed["link"], "http://localhost:9000/media/clips/intro.txt");
    assert!(store.contains("media", "clips/intro.txt"));
}

#[tokio::test]
async fn download_report_json_contract() {
    let (ctx, _) = context_with(local_config());
    let dir = tempfile::tempdir().unwrap();
    let out = ctx
        .with_format(OutputFormat::Json)
        .execute(&Commands::Download {
            targets: vec!["docs/readme.txt".to_string(), "docs/nope.txt".to_string()],
            to: Some(PathBuf::from(dir.path())),
        })
        .await
        .unwrap();
    assert!(out.partial_failure);
    let parsed: serde_json::Value = serde_json::from_str(&out.rendered).unwrap();
    assert_eq!(parsed["operation"], "download");
    assert_eq!(parsed["success_count"], 1);
    assert_eq!(parsed["fail_count"], 1);
    assert_eq!(parsed["failures"][0]["kind"], "not_found");
    assert!(dir.path().join("readme.txt").exists());
}

#[tokio::test]
async fn parent_of_bucket_is_an_error() {
    let (ctx, _) = context_with(local_config());
    assert!(ctx
        .execute(&Commands::Parent {
            target: "docs".to_string()
        })
        .await
        .is_err());
    let out = ctx
        .execute(&Commands::Parent {
            target: "docs/img/logo.png".to_string(),
        })
        .await
        .unwrap();
    assert!(out.rendered.contains("s3://localhost:9000/docs/img/"));
}
