//! CLI Tooling
//!
//! Command-line front end over the hierarchy resolver and transfer service.
//! Every command renders to a string (a table or JSON) so the binary only has
//! to print it.

use crate::codec::{ResourceCodec, ResourceId, SEPARATOR};
use crate::config::{BucketviewConfig, ConfigLoader};
use crate::error::ApiError;
use crate::store::ObjectStoreClient;
use crate::transfer::{BatchReport, TransferService, UploadOutcome};
use crate::tree::{HierarchyResolver, Node};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets, Table};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Bucketview CLI - browse S3-compatible object stores as a tree
#[derive(Parser)]
#[command(name = "bucketview")]
#[command(about = "Browse and transfer objects in S3-compatible stores")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for .bucketview.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Targets are full identifiers (`s3://host/bucket/key`) or `bucket/key`
/// shorthand resolved against the configured endpoint.
#[derive(Subcommand)]
pub enum Commands {
    /// List buckets
    Buckets,
    /// List the immediate children of a bucket or folder (root when omitted)
    Ls {
        target: Option<String>,
    },
    /// Print an object's content
    Cat {
        target: String,
    },
    /// Upload local files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target bucket (defaults to transfer.bucket, then browse.default_bucket)
        #[arg(long)]
        bucket: Option<String>,
        /// Key prefix (defaults to transfer.sub_directory)
        #[arg(long)]
        dir: Option<String>,
    },
    /// Download objects
    Download {
        #[arg(required = true)]
        targets: Vec<String>,
        /// Destination directory (defaults to transfer.download_directory)
        #[arg(long)]
        to: Option<PathBuf>,
    },
    /// Delete objects
    Rm {
        #[arg(required = true)]
        targets: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the public link of an object
    Link {
        target: String,
    },
    /// Print the enclosing folder or bucket
    Parent {
        target: String,
    },
    /// Encode a bucket and key into a resource identifier
    Encode {
        bucket: String,
        #[arg(default_value = "")]
        key: String,
    },
    /// Decode a resource identifier into bucket and key
    Decode {
        id: String,
    },
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Buckets => "buckets",
        Commands::Ls { .. } => "ls",
        Commands::Cat { .. } => "cat",
        Commands::Upload { .. } => "upload",
        Commands::Download { .. } => "download",
        Commands::Rm { .. } => "rm",
        Commands::Link { .. } => "link",
        Commands::Parent { .. } => "parent",
        Commands::Encode { .. } => "encode",
        Commands::Decode { .. } => "decode",
    }
}

/// Rendered command result.
#[derive(Debug)]
pub struct CommandOutput {
    pub rendered: String,
    /// At least one batch item failed.
    pub partial_failure: bool,
}

impl CommandOutput {
    fn ok(rendered: String) -> Self {
        Self {
            rendered,
            partial_failure: false,
        }
    }
}

/// CLI context: resolved configuration plus the services built on one client.
pub struct CliContext {
    config: BucketviewConfig,
    resolver: HierarchyResolver,
    transfer: TransferService,
    format: OutputFormat,
}

impl CliContext {
    /// Load configuration the way the binary does: an explicit file, else the
    /// layered sources rooted at `workspace`.
    pub fn load_config(
        workspace: &Path,
        config_path: Option<&Path>,
    ) -> Result<BucketviewConfig, ApiError> {
        match config_path {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(workspace),
        }
    }

    /// Context backed by an S3 client for the configured endpoint.
    #[cfg(feature = "s3")]
    pub fn from_config(config: BucketviewConfig) -> Result<Self, ApiError> {
        let endpoint = config.store.endpoint()?;
        if !config.store.has_credentials() {
            debug!("No store credentials configured, requests are anonymous");
        }
        let client = crate::store::S3ObjectStore::new(
            &endpoint,
            &config.store.region,
            &config.store.access_key,
            &config.store.secret_key,
        )?;
        Self::with_client(Arc::new(client), config)
    }

    pub fn with_client(
        client: Arc<dyn ObjectStoreClient>,
        config: BucketviewConfig,
    ) -> Result<Self, ApiError> {
        let endpoint = config.store.endpoint()?;
        let codec = ResourceCodec::for_endpoint(&endpoint, &config.store.identifier_scheme);
        let resolver = HierarchyResolver::new(Arc::clone(&client), codec.clone())
            .with_default_bucket(config.browse.default_bucket.clone());
        let transfer = TransferService::new(client, endpoint, codec)
            .with_concurrency(config.transfer.concurrency);
        Ok(Self {
            config,
            resolver,
            transfer,
            format: OutputFormat::Text,
        })
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn config(&self) -> &BucketviewConfig {
        &self.config
    }

    fn codec(&self) -> &ResourceCodec {
        self.resolver.codec()
    }

    /// Full identifiers pass through; `bucket[/key]` is encoded.
    pub fn parse_target(&self, raw: &str) -> ResourceId {
        if raw.contains("://") {
            return ResourceId::from(raw);
        }
        let trimmed = raw.trim_start_matches(SEPARATOR);
        match trimmed.split_once(SEPARATOR) {
            Some((bucket, key)) => self.codec().encode(bucket, key),
            None => self.codec().encode_bucket(trimmed),
        }
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        debug!(command = command_name(command), "Executing command");
        match command {
            Commands::Buckets => {
                let buckets = self.resolver.try_list_buckets().await?;
                self.render_nodes(&buckets).map(CommandOutput::ok)
            }
            Commands::Ls { target } => {
                let node = match target {
                    Some(raw) => Some(self.resolver.node_for(&self.parse_target(raw))?),
                    None => None,
                };
                let children = self.resolver.get_children(node.as_ref()).await?;
                self.render_nodes(&children).map(CommandOutput::ok)
            }
            Commands::Cat { target } => self.handle_cat(target).await.map(CommandOutput::ok),
            Commands::Upload { files, bucket, dir } => {
                self.handle_upload(files, bucket.as_deref(), dir.as_deref())
                    .await
            }
            Commands::Download { targets, to } => self.handle_download(targets, to.as_deref()).await,
            Commands::Rm { targets, yes } => self.handle_rm(targets, *yes).await,
            Commands::Link { target } => {
                let link = self.transfer.copy_link(&self.parse_target(target))?;
                Ok(CommandOutput::ok(match self.format {
                    OutputFormat::Text => link,
                    OutputFormat::Json => to_json(&json!({ "link": link }))?,
                }))
            }
            Commands::Parent { target } => {
                let node = self.resolver.node_for(&self.parse_target(target))?;
                let parent = self.resolver.get_parent(&node).ok_or_else(|| {
                    ApiError::PreconditionFailed(format!("'{}' has no parent", node.resource_id))
                })?;
                self.render_nodes(std::slice::from_ref(&parent))
                    .map(CommandOutput::ok)
            }
            Commands::Encode { bucket, key } => {
                let id = self.codec().encode(bucket, key);
                Ok(CommandOutput::ok(match self.format {
                    OutputFormat::Text => id.into_string(),
                    OutputFormat::Json => to_json(&json!({ "resource_id": id }))?,
                }))
            }
            Commands::Decode { id } => {
                let (bucket, key) = self.codec().decode(&ResourceId::from(id.as_str()));
                Ok(CommandOutput::ok(match self.format {
                    OutputFormat::Text => format!("bucket: {}\nkey: {}", bucket, key),
                    OutputFormat::Json => to_json(&json!({ "bucket": bucket, "key": key }))?,
                }))
            }
        }
    }

    async fn handle_cat(&self, target: &str) -> Result<String, ApiError> {
        let node = self.resolver.node_for(&self.parse_target(target))?;
        let body = self.resolver.read_content(&node).await?;
        let text = String::from_utf8_lossy(&body);
        match self.format {
            OutputFormat::Text => Ok(text.into_owned()),
            OutputFormat::Json => to_json(&json!({
                "resource_id": node.resource_id,
                "size": body.len(),
                "content": text,
            })),
        }
    }

    async fn handle_upload(
        &self,
        files: &[PathBuf],
        bucket: Option<&str>,
        dir: Option<&str>,
    ) -> Result<CommandOutput, ApiError> {
        let bucket = bucket
            .filter(|b| !b.is_empty())
            .or_else(|| self.config.upload_bucket())
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "No upload bucket: pass --bucket or set transfer.bucket".to_string(),
                )
            })?;
        let dir = dir.unwrap_or(&self.config.transfer.sub_directory);

        if let [file] = files {
            let outcome = self.transfer.upload_file(file, bucket, dir).await?;
            return self.render_upload(&outcome).map(CommandOutput::ok);
        }
        let report = self.transfer.upload_many(files.to_vec(), bucket, dir).await;
        self.render_report(&report)
    }

    async fn handle_download(
        &self,
        targets: &[String],
        to: Option<&Path>,
    ) -> Result<CommandOutput, ApiError> {
        let directory = match to {
            Some(dir) => dir.to_path_buf(),
            None => self.config.transfer.resolve_download_dir(),
        };
        tokio::fs::create_dir_all(&directory).await?;
        let ids = targets.iter().map(|t| self.parse_target(t)).collect();
        let report = self.transfer.download_many(ids, &directory).await;
        self.render_report(&report)
    }

    async fn handle_rm(&self, targets: &[String], yes: bool) -> Result<CommandOutput, ApiError> {
        let ids: Vec<ResourceId> = targets.iter().map(|t| self.parse_target(t)).collect();
        if !yes {
            use dialoguer::Confirm;
            let prompt = match ids.as_slice() {
                [only] => format!("Delete '{}'?", only),
                _ => format!("Delete {} objects?", ids.len()),
            };
            let confirmed = Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                info!("Deletion cancelled");
                return Ok(CommandOutput::ok("Deletion cancelled".to_string()));
            }
        }
        let report = self.transfer.delete_many(ids).await;
        self.render_report(&report)
    }

    fn render_nodes(&self, nodes: &[Node]) -> Result<String, ApiError> {
        match self.format {
            OutputFormat::Json => to_json(&nodes),
            OutputFormat::Text => Ok(format_nodes_table(nodes)),
        }
    }

    fn render_upload(&self, outcome: &UploadOutcome) -> Result<String, ApiError> {
        match self.format {
            OutputFormat::Json => to_json(outcome),
            OutputFormat::Text => {
                let mut table = Table::new();
                table.load_preset(presets::UTF8_FULL);
                table.set_header(vec!["Bucket", "Key", "Content Type", "Link"]);
                table.add_row(vec![
                    &outcome.bucket,
                    &outcome.key,
                    &outcome.content_type,
                    &outcome.link,
                ]);
                Ok(table.to_string())
            }
        }
    }

    fn render_report(&self, report: &BatchReport) -> Result<CommandOutput, ApiError> {
        let rendered = match self.format {
            OutputFormat::Json => to_json(report)?,
            OutputFormat::Text => format_report_text(report),
        };
        Ok(CommandOutput {
            rendered,
            partial_failure: !report.is_clean(),
        })
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}

fn format_nodes_table(nodes: &[Node]) -> String {
    if nodes.is_empty() {
        return "(empty)".to_string();
    }
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Kind", "Name", "Resource ID"]);
    for node in nodes {
        table.add_row(vec![
            node.kind.as_str(),
            node.label.as_str(),
            node.resource_id.as_str(),
        ]);
    }
    table.to_string()
}

fn format_report_text(report: &BatchReport) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Target", "Status", "Error"]);
    for target in &report.succeeded {
        table.add_row(vec![target.as_str(), "ok", ""]);
    }
    for failure in &report.failures {
        table.add_row(vec![
            failure.target.as_str(),
            failure.kind.as_str(),
            failure.message.as_str(),
        ]);
    }
    format!(
        "{}\n{}: {} succeeded, {} failed",
        table, report.operation, report.success_count, report.fail_count
    )
}
