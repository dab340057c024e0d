use crate::errors::{ConfigError, DashboardError};
use std::path::PathBuf;
use std::str::FromStr;

pub const DB_BACKEND_ENV: &str = "C4V_DB_BACKEND";
pub const LOCAL_FILES_ROOT_ENV: &str = "C4V_LOCAL_FILES_ROOT";
pub const DB_PATH_ENV: &str = "C4V_DB_PATH";

pub const DEFAULT_DB_BACKEND: &str = "SQLITE";
pub const DEFAULT_DB_FILE: &str = "c4v_db.sqlite";
pub const EXPERIMENTS_DIR: &str = "experiments";
const DEFAULT_ROOT_DIR: &str = ".c4v";

/// Storage backends the dashboard can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
}

impl FromStr for Backend {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("sqlite") {
            Ok(Self::Sqlite)
        } else {
            Err(DashboardError::BackendNotImplemented(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_backend: String,
    pub local_files_root: PathBuf,
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        Self::resolve(
            get(DB_BACKEND_ENV),
            get(LOCAL_FILES_ROOT_ENV).map(PathBuf::from),
            get(DB_PATH_ENV).map(PathBuf::from),
        )
    }

    /// Fill in defaults for whatever was not given. Empty paths count as unset.
    pub fn resolve(
        db_backend: Option<String>,
        local_files_root: Option<PathBuf>,
        db_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();

        let local_files_root = match local_files_root.filter(non_empty) {
            Some(root) => root,
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_ROOT_DIR))
                .ok_or_else(|| {
                    ConfigError(format!(
                        "cannot resolve home directory; set {LOCAL_FILES_ROOT_ENV}"
                    ))
                })?,
        };

        Ok(Self {
            db_backend: db_backend
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_BACKEND.to_string()),
            local_files_root,
            db_path: db_path.filter(non_empty),
        })
    }

    pub fn backend(&self) -> Result<Backend, DashboardError> {
        self.db_backend.parse()
    }

    pub fn experiments_root(&self) -> PathBuf {
        self.local_files_root.join(EXPERIMENTS_DIR)
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.local_files_root.join(DEFAULT_DB_FILE))
    }
}
