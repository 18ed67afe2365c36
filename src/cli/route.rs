//! CLI route: single route table and run context. Dispatches to the node and presentation.

use crate::cli::parse::{Commands, PinCommands};
use crate::cli::presentation::{
    format_add_summary, format_directory_listing, format_init_summary, format_live_set,
    format_pin_list_json, format_pin_list_text,
};
use crate::config::{ConfigLoader, PinseedConfig};
use crate::dag;
use crate::error::{ApiError, PinError};
use crate::node::Node;
use crate::pin::{PinChange, PinMode};
use crate::seed::bundled::{self, DIR_INDEX, INIT_DOCS};
use crate::seed::{Asset, AssetSeeder, SeedOptions};
use crate::types::ContentId;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Runtime context for CLI execution: repository root, loaded config and the open node.
pub struct RunContext {
    node: Node,
    config: PinseedConfig,
    repo_root: PathBuf,
    /// Shared by every concurrent seed; only built when `seed.concurrent_adds` is set
    runtime: Option<tokio::runtime::Runtime>,
}

impl RunContext {
    /// Create run context from an optional repo root and optional config path.
    ///
    /// An explicit `--repo` wins over `repo_root` from configuration, which
    /// wins over the platform data directory.
    pub fn new(repo: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => {
                let lookup_root = repo.clone().unwrap_or_else(crate::config::default_repo_root);
                ConfigLoader::load(&lookup_root)?
            }
        };
        config.validate()?;

        let repo_root = repo.unwrap_or_else(|| config.resolve_repo_root());
        std::fs::create_dir_all(&repo_root)
            .map_err(|e| ApiError::Storage(crate::error::StorageError::IoError(e)))?;

        let node = Node::open(&repo_root, &config.storage)?;

        let runtime = if config.seed.concurrent_adds {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|e| {
                    warn!(error = %e, "Failed to start async runtime");
                    ApiError::Storage(crate::error::StorageError::IoError(e))
                })?;
            Some(runtime)
        } else {
            None
        };

        Ok(Self {
            node,
            config,
            repo_root,
            runtime,
        })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Init => self.handle_init(),
            Commands::Add { files } => self.handle_add(files),
            Commands::Ls { id } => self.handle_ls(id),
            Commands::Cat { id } => self.handle_cat(id),
            Commands::Pin { command } => self.handle_pin_command(command),
        };
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_init(&self) -> Result<String, ApiError> {
        let docs = self.seed(bundled::to_asset_list(INIT_DOCS))?;
        let index = self.seed(bundled::to_asset_list(DIR_INDEX))?;
        Ok(format_init_summary(&[
            ("init-doc", docs),
            ("dir-index-html", index),
        ]))
    }

    fn handle_add(&self, files: &[PathBuf]) -> Result<String, ApiError> {
        let assets = files
            .iter()
            .map(|path| {
                std::fs::read(path)
                    .map(|bytes| Asset::new(path.clone(), bytes))
                    .map_err(|e| {
                        ApiError::InvalidArgument(format!("Cannot read {}: {}", path.display(), e))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let root = self.seed(assets)?;
        Ok(format_add_summary(&root, files.len()))
    }

    fn handle_ls(&self, id: &str) -> Result<String, ApiError> {
        let id = parse_id(id)?;
        let dir = dag::load_directory(self.node.store(), &id)?;
        Ok(format_directory_listing(&dir))
    }

    fn handle_cat(&self, id: &str) -> Result<String, ApiError> {
        let id = parse_id(id)?;
        let bytes = self
            .node
            .store()
            .get(&id)?
            .ok_or_else(|| ApiError::InvalidArgument(format!("Object not found: {}", id)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn handle_pin_command(&self, command: &PinCommands) -> Result<String, ApiError> {
        let pins = self.node.pins();
        match command {
            PinCommands::Add { id, direct } => {
                let id = parse_id(id)?;
                if !self.node.store().contains(&id)? {
                    return Err(ApiError::InvalidArgument(format!(
                        "Object not found: {}",
                        id
                    )));
                }
                let mode = PinMode::from_recursive(!*direct);
                let change = pins.pin(id, mode);
                pins.flush()?;
                Ok(match change {
                    PinChange::Added => format!("Pinned {} ({})", id, mode),
                    PinChange::Unchanged => format!("Already pinned {} ({})", id, mode),
                    PinChange::ModeChanged { from } => {
                        format!("Pinned {} ({}, was {})", id, mode, from)
                    }
                })
            }
            PinCommands::Rm { id } => {
                let id = parse_id(id)?;
                let mode = pins.unpin(&id).map_err(|e| match e {
                    PinError::NotPinned(_) => ApiError::InvalidArgument(e.to_string()),
                    other => ApiError::Pin(other),
                })?;
                pins.flush()?;
                Ok(format!("Unpinned {} ({})", id, mode))
            }
            PinCommands::Ls { format } => match format.as_str() {
                "json" => format_pin_list_json(&pins.list()),
                "text" => Ok(format_pin_list_text(&pins.list())),
                other => Err(ApiError::InvalidArgument(format!(
                    "Invalid format: {} (must be 'text' or 'json')",
                    other
                ))),
            },
            PinCommands::Live => {
                let live = pins.live_set(self.node.store())?;
                Ok(format_live_set(&live))
            }
        }
    }

    fn seed(&self, assets: Vec<Asset>) -> Result<ContentId, ApiError> {
        let seeder =
            AssetSeeder::new(&self.node).with_options(SeedOptions::from(&self.config.seed));

        match self.runtime {
            Some(ref runtime) => Ok(runtime.block_on(seeder.seed_concurrent(&assets))?),
            None => Ok(seeder.seed(&assets)?),
        }
    }
}

fn parse_id(text: &str) -> Result<ContentId, ApiError> {
    text.parse::<ContentId>()
        .map_err(|e| ApiError::InvalidArgument(format!("Invalid id '{}': {}", text, e)))
}
