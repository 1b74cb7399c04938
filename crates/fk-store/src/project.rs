use std::path::{Path, PathBuf};
use std::process::Command;
use std::{env, fs};

use fk_core::{FlagError, ManagedList, ManagedSetStore};

use crate::config::{CONFIG_FILE, Config};
use crate::error::{Result, StoreError};
use crate::store::Store;

/// Default base directory for all fk storage.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".flagkeep")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn detect_git_root(from: &Path) -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(from)
        .output()
        .ok()?;

    if output.status.success() {
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            None
        } else {
            Some(PathBuf::from(root))
        }
    } else {
        None
    }
}

/// Resolve the database filename stem for a project.
///
/// Priority chain:
/// 1. Explicit `--project` name
/// 2. Git repo root directory basename
/// 3. CWD basename
fn resolve_project_id(project_name: Option<&str>) -> String {
    if let Some(name) = project_name {
        let sanitized = sanitize_name(name);
        if !sanitized.is_empty() {
            return sanitized;
        }
    }

    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if let Some(git_root) = detect_git_root(&cwd)
        && let Some(basename) = git_root.file_name()
    {
        let name = sanitize_name(&basename.to_string_lossy());
        if !name.is_empty() {
            return name;
        }
    }

    cwd.file_name()
        .map(|n| sanitize_name(&n.to_string_lossy()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "unnamed".to_string())
}

/// Sanitize a project name for use as a filename.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A project's database plus the shared configuration.
///
/// Layout:
/// ```text
/// ~/.flagkeep/
/// ├── config.toml
/// └── projects/
///     ├── <project>.db
///     └── ...
/// ```
pub struct ProjectStore {
    store: Store,
    config: Config,
    managed: ManagedSetStore,
    project_id: String,
}

impl ProjectStore {
    /// Open the project database and configuration, creating directories
    /// as needed. `base_dir` overrides [`default_base_dir`].
    pub fn open(project_name: Option<&str>, base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        let projects_dir = base.join("projects");

        fs::create_dir_all(&projects_dir).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", projects_dir.display()))
        })?;

        let config = Config::load(&base.join(CONFIG_FILE))?;
        let project_id = resolve_project_id(project_name);
        let store = Store::open(&projects_dir.join(format!("{project_id}.db")))?;
        tracing::debug!("opened project '{project_id}' under {}", base.display());

        Self::assemble(store, config, project_id)
    }

    /// In-memory database with default configuration.
    pub fn open_in_memory() -> Result<Self> {
        Self::assemble(Store::open_in_memory()?, Config::default(), "test".into())
    }

    fn assemble(store: Store, config: Config, project_id: String) -> Result<Self> {
        let managed = config.managed_set_store()?;
        Ok(Self {
            store,
            config,
            managed,
            project_id,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The persisted managed list, all entries disabled.
    pub fn load_managed(&self) -> ManagedList {
        self.managed.load(&self.store)
    }

    pub fn save_managed(&self, list: &ManagedList) -> std::result::Result<(), FlagError> {
        self.managed.save(&self.store, list)
    }
}
