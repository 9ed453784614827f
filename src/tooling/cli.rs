//! CLI Tooling
//!
//! Command-line interface over a persisted workspace. Every mutating command
//! opens a session at the selected version, applies one operation and saves.

use crate::cascade;
use crate::config::SandtreeConfig;
use crate::error::ApiError;
use crate::logging::LogOverrides;
use crate::notify::{ConsoleSink, NotificationSink, TracingSink};
use crate::path;
use crate::store::{SaveReport, SledSnapshotStore, SnapshotStore, VersionedSnapshotStore};
use crate::types::{EntryKind, Version, WorkspaceId};
use crate::workspace::{
    format_listing_text, format_tree_text, format_versions_text, InMemoryWorkspace, ListingOutput,
    ListingRow, TreeOutput, VersionsOutput, WorkspaceSession,
};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Sandtree CLI - edit a versioned virtual file tree
#[derive(Parser)]
#[command(name = "sandtree")]
#[command(about = "Edit a flat path map as a file tree, with mirror-forward versioned saves")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (replaces the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot database directory (overrides storage.store_path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Workspace to operate on (default: session.default_workspace)
    #[arg(long, global = true)]
    pub workspace_id: Option<String>,

    /// Version to open (default: latest saved version, or 0)
    #[arg(long, global = true)]
    pub at_version: Option<Version>,

    /// Echo operation notifications to stderr
    #[arg(long, global = true)]
    pub notify: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging flags as overrides that outrank `SANDTREE_LOG*` variables.
    pub fn log_overrides(&self) -> LogOverrides {
        LogOverrides {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the folder tree
    Tree {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List every file with its size
    Ls {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print a file's content
    Cat {
        path: String,
    },
    /// Create a file or folder, then save
    Create {
        path: String,
        /// Create a folder instead of a file
        #[arg(long, conflicts_with_all = ["content", "from_file"])]
        folder: bool,
        /// Initial content
        #[arg(long, conflicts_with = "from_file")]
        content: Option<String>,
        /// Read initial content from a local file
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Replace a file's content, then save
    Write {
        path: String,
        /// New content
        #[arg(long, conflicts_with = "from_file")]
        content: Option<String>,
        /// Read new content from a local file
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Rename a file or folder (moving everything beneath it), then save
    Rename {
        from: String,
        to: String,
    },
    /// Delete a file or folder (and everything beneath it), then save
    Delete {
        path: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Load a local directory's UTF-8 files, then save
    Import {
        dir: PathBuf,
        /// Folder to import under (default: root)
        #[arg(long, default_value = "/")]
        into: String,
    },
    /// List saved versions
    Versions {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tree { .. } => "tree",
        Commands::Ls { .. } => "ls",
        Commands::Cat { .. } => "cat",
        Commands::Create { .. } => "create",
        Commands::Write { .. } => "write",
        Commands::Rename { .. } => "rename",
        Commands::Delete { .. } => "delete",
        Commands::Import { .. } => "import",
        Commands::Versions { .. } => "versions",
        Commands::Config => "config",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}

/// CLI context: resolved configuration plus the opened snapshot store
pub struct CliContext {
    config: SandtreeConfig,
    store: VersionedSnapshotStore,
    workspace_id: WorkspaceId,
    at_version: Option<Version>,
    sink: Arc<dyn NotificationSink>,
    color: bool,
}

impl CliContext {
    /// Open the sled store named by `store_override` or the configuration.
    pub fn new(config: SandtreeConfig, store_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let store_path = match store_override {
            Some(path) => path,
            None => config.storage.resolve_store_path()?,
        };
        let backend = SledSnapshotStore::open(&store_path)?;
        info!(store = %store_path.display(), "snapshot store opened");
        Self::with_backend(config, Arc::new(backend))
    }

    /// Build a context over any snapshot backend.
    pub fn with_backend(
        config: SandtreeConfig,
        backend: Arc<dyn SnapshotStore>,
    ) -> Result<Self, ApiError> {
        let workspace_id = WorkspaceId::new(config.session.default_workspace.clone())?;
        let color = config.logging.color && std::io::stdout().is_terminal();
        Ok(Self {
            config,
            store: VersionedSnapshotStore::new(backend),
            workspace_id,
            at_version: None,
            sink: Arc::new(TracingSink),
            color,
        })
    }

    /// Apply the workspace, version and notification flags.
    pub fn select(mut self, cli: &Cli) -> Result<Self, ApiError> {
        if let Some(id) = &cli.workspace_id {
            self.workspace_id = WorkspaceId::new(id.clone())?;
        }
        self.at_version = cli.at_version;
        if cli.notify {
            let color = self.config.logging.color && std::io::stderr().is_terminal();
            self = self.with_sink(Arc::new(ConsoleSink { color }));
        }
        Ok(self)
    }

    pub fn for_workspace(mut self, id: WorkspaceId) -> Self {
        self.workspace_id = id;
        self
    }

    pub fn at_version(mut self, version: Option<Version>) -> Self {
        self.at_version = version;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SandtreeConfig {
        &self.config
    }

    pub fn store(&self) -> &VersionedSnapshotStore {
        &self.store
    }

    /// Explicit `--at-version`, else the newest saved version, else 0
    pub fn selected_version(&self) -> Result<Version, ApiError> {
        match self.at_version {
            Some(version) => Ok(version),
            None => Ok(self.store.latest_version(&self.workspace_id)?.unwrap_or(0)),
        }
    }

    fn open_session(&self) -> Result<WorkspaceSession<InMemoryWorkspace>, ApiError> {
        WorkspaceSession::open(
            self.workspace_id.clone(),
            self.selected_version()?,
            InMemoryWorkspace::new(),
            self.store.clone(),
            Arc::clone(&self.sink),
            self.config.session.clone(),
        )
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(command = command_name(command), workspace = %self.workspace_id, "command finished"),
            Err(e) => warn!(command = command_name(command), workspace = %self.workspace_id, error = %e, "command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree { format } => self.handle_tree(parse_format(format)?),
            Commands::Ls { format } => self.handle_ls(parse_format(format)?),
            Commands::Cat { path } => self.open_session()?.read(path),
            Commands::Create {
                path,
                folder,
                content,
                from_file,
            } => self.handle_create(path, *folder, content.as_deref(), from_file.as_deref()),
            Commands::Write {
                path,
                content,
                from_file,
            } => self.handle_write(path, content.as_deref(), from_file.as_deref()),
            Commands::Rename { from, to } => self.handle_rename(from, to),
            Commands::Delete { path, yes } => self.handle_delete(path, *yes),
            Commands::Import { dir, into } => self.handle_import(dir, into),
            Commands::Versions { format } => self.handle_versions(parse_format(format)?),
            Commands::Config => self.config.to_toml(),
        }
    }

    fn handle_tree(&self, format: OutputFormat) -> Result<String, ApiError> {
        let session = self.open_session()?;
        let output = TreeOutput {
            workspace_id: self.workspace_id.to_string(),
            version: session.version(),
            file_count: session.workspace().len(),
            roots: session.tree().to_vec(),
        };
        match format {
            OutputFormat::Json => to_json(&output),
            OutputFormat::Text => Ok(format_tree_text(&output, self.color)),
        }
    }

    fn handle_ls(&self, format: OutputFormat) -> Result<String, ApiError> {
        let session = self.open_session()?;
        let rows: Vec<ListingRow> = session
            .workspace()
            .files()
            .iter()
            .map(|(path, content)| ListingRow {
                path: path.clone(),
                bytes: content.len(),
            })
            .collect();
        let output = ListingOutput {
            workspace_id: self.workspace_id.to_string(),
            version: session.version(),
            total_bytes: rows.iter().map(|r| r.bytes).sum(),
            rows,
        };
        match format {
            OutputFormat::Json => to_json(&output),
            OutputFormat::Text => Ok(format_listing_text(&output)),
        }
    }

    fn handle_create(
        &self,
        target: &str,
        folder: bool,
        content: Option<&str>,
        from_file: Option<&Path>,
    ) -> Result<String, ApiError> {
        let mut session = self.open_session()?;
        if folder {
            session.create(target, EntryKind::Folder, None)?;
        } else {
            let content = read_content(content, from_file)?;
            session.create(target, EntryKind::File, content)?;
        }
        let report = session.save()?;
        let kind = if folder { EntryKind::Folder } else { EntryKind::File };
        Ok(format!("Created {} {}\n{}", kind, target, saved_line(&report)))
    }

    fn handle_write(
        &self,
        target: &str,
        content: Option<&str>,
        from_file: Option<&Path>,
    ) -> Result<String, ApiError> {
        let content = read_content(content, from_file)?.ok_or_else(|| {
            ApiError::ConfigError("write needs --content or --from-file".to_string())
        })?;
        let mut session = self.open_session()?;
        session.write(target, content)?;
        let report = session.save()?;
        Ok(format!("Updated {}\n{}", target, saved_line(&report)))
    }

    fn handle_rename(&self, from: &str, to: &str) -> Result<String, ApiError> {
        let mut session = self.open_session()?;
        let report = session.rename(from, to)?;
        let saved = session.save()?;
        let mut out = format!(
            "Renamed {} to {} ({} file(s) moved)\n",
            from,
            to,
            report.applied.len()
        );
        for skipped in &report.skipped {
            out.push_str(&format!("Skipped {}: content could not be read\n", skipped.from));
        }
        out.push_str(&saved_line(&saved));
        Ok(out)
    }

    fn handle_delete(&self, target: &str, yes: bool) -> Result<String, ApiError> {
        let mut session = self.open_session()?;
        let affected = cascade::affected_paths(session.workspace(), target);
        if affected.is_empty() {
            return Err(ApiError::NotFound(target.to_string()));
        }

        if self.config.session.confirm_deletes && !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete '{}' ({} file(s))?", target, affected.len()))
                .default(false)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }

        let removed = session.delete(target)?;
        let report = session.save()?;
        Ok(format!(
            "Deleted {} ({} file(s))\n{}",
            target,
            removed.len(),
            saved_line(&report)
        ))
    }

    fn handle_import(&self, dir: &Path, into: &str) -> Result<String, ApiError> {
        let files = collect_local_files(dir, into)?;
        let mut session = self.open_session()?;
        let mut imported = 0usize;
        let mut rejected = Vec::new();
        for (target, content) in files {
            let result = match session.kind_of(&target) {
                Some(EntryKind::File) => session.write(&target, content),
                _ => session.create(&target, EntryKind::File, Some(content)),
            };
            match result {
                Ok(()) => imported += 1,
                Err(e) if e.is_validation() => {
                    warn!(path = %target, error = %e, "import skipped path");
                    rejected.push(format!("{}: {}", target, e));
                }
                Err(e) => return Err(e),
            }
        }
        let report = session.save()?;
        let mut out = format!("Imported {} file(s) from {}\n", imported, dir.display());
        for line in &rejected {
            out.push_str(&format!("Skipped {}\n", line));
        }
        out.push_str(&saved_line(&report));
        Ok(out)
    }

    fn handle_versions(&self, format: OutputFormat) -> Result<String, ApiError> {
        let output = VersionsOutput {
            workspace_id: self.workspace_id.to_string(),
            versions: self.store.versions(&self.workspace_id)?,
        };
        match format {
            OutputFormat::Json => to_json(&output),
            OutputFormat::Text => Ok(format_versions_text(&output)),
        }
    }
}

fn saved_line(report: &SaveReport) -> String {
    format!(
        "Saved {} file(s) as versions {} and {}",
        report.entry_count, report.version, report.next_version
    )
}

fn read_content(content: Option<&str>, from_file: Option<&Path>) -> Result<Option<String>, ApiError> {
    match (content, from_file) {
        (Some(text), _) => Ok(Some(text.to_string())),
        (None, Some(file)) => std::fs::read_to_string(file)
            .map(Some)
            .map_err(|e| ApiError::InputError {
                path: file.display().to_string(),
                reason: e.to_string(),
            }),
        (None, None) => Ok(None),
    }
}

/// Walk `dir` and map every UTF-8 file to a workspace path under `into`.
///
/// Files that are not valid UTF-8 are skipped with a warning.
fn collect_local_files(dir: &Path, into: &str) -> Result<Vec<(String, String)>, ApiError> {
    let input_error = |reason: String| ApiError::InputError {
        path: dir.display().to_string(),
        reason,
    };
    let root = dunce::canonicalize(dir).map_err(|e| input_error(e.to_string()))?;
    if !root.is_dir() {
        return Err(input_error("not a directory".to_string()));
    }
    let into = into.trim_end_matches(path::SEPARATOR);
    if !into.is_empty() {
        path::validate(into)?;
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| input_error(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(&root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let target = segments
            .iter()
            .fold(into.to_string(), |acc, segment| {
                path::join(&acc, segment)
            });
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => files.push((target, content)),
            Err(e) => warn!(file = %entry.path().display(), error = %e, "import skipped unreadable file"),
        }
    }
    Ok(files)
}
