use dotenvy::dotenv;
use std::env;
use std::path::{Path, PathBuf};

/// Where every component reads and writes its files.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Whole-state JSON document
    pub data_file: PathBuf,
    /// CSV ledger appended by batch runs
    pub history_file: PathBuf,
    pub backup_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl StorageConfig {
    /// Roots every path under `dir`, keeping the default file names.
    pub fn under(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_file: dir.join("data").join("payroll.json"),
            history_file: dir.join("data").join("payroll_history.csv"),
            backup_dir: dir.join("backups"),
            export_dir: dir.join("exports"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::under(".")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    /// Routes and the served OpenAPI paths are both mounted here
    pub api_prefix: String,
    pub log_dir: PathBuf,
    pub company_budget: f64,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = StorageConfig::default();
        let path_var = |key: &str, default: PathBuf| {
            env::var(key).map(PathBuf::from).unwrap_or(default)
        };

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: path_var("LOG_DIR", PathBuf::from("logs")),
            company_budget: env::var("COMPANY_BUDGET")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COMPANY_BUDGET),
            storage: StorageConfig {
                data_file: path_var("DATA_FILE", defaults.data_file),
                history_file: path_var("HISTORY_FILE", defaults.history_file),
                backup_dir: path_var("BACKUP_DIR", defaults.backup_dir),
                export_dir: path_var("EXPORT_DIR", defaults.export_dir),
            },
        }
    }

    /// Configuration for a server whose files all live under `dir`.
    pub fn for_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: dir.join("logs"),
            company_budget: DEFAULT_COMPANY_BUDGET,
            storage: StorageConfig::under(dir),
        }
    }
}

pub const DEFAULT_COMPANY_BUDGET: f64 = 2_000_000.0;
