use clap::{Parser, Subcommand};
use microscope_core::config::{Config, DB_BACKEND_ENV, DB_PATH_ENV, LOCAL_FILES_ROOT_ENV};
use microscope_core::errors::ConfigError;
use microscope_core::DashboardQuery;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "microscope",
    version,
    about = "See how scraping, crawling and classification are going: browse stored records and trigger classification"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Storage backend (only SQLITE is implemented)
    #[arg(long, global = true, env = DB_BACKEND_ENV)]
    pub db_backend: Option<String>,

    /// Root for local files: experiments/ and the default database
    #[arg(long, global = true, env = LOCAL_FILES_ROOT_ENV)]
    pub local_files_root: Option<PathBuf>,

    /// SQLite database file (default: <local-files-root>/c4v_db.sqlite)
    #[arg(long = "db", global = true, env = DB_PATH_ENV)]
    pub db: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        Config::resolve(
            self.db_backend.clone(),
            self.local_files_root.clone(),
            self.db.clone(),
        )
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show stored records, filtered and truncated for display
    Dashboard(DashboardArgs),
    /// List experiment branches
    Branches,
    /// List the experiments of a branch
    Experiments(ExperimentsArgs),
    /// Print an experiment's summary
    Summary(SummaryArgs),
    /// Label pending records with an experiment's classifier
    Classify(ClassifyArgs),
    /// Load records from a JSON-lines file into the database
    Import(ImportArgs),
    /// Print accepted --label and --scraped values
    Options,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Label assigned by the classifier (ANY, NO_LABEL or a label value)
    #[arg(long, default_value = "ANY")]
    pub label: String,

    /// Whether the record's data is complete (ANY, YES, NO)
    #[arg(long, default_value = "ANY")]
    pub scraped: String,

    /// Maximum amount of rows to retrieve and show
    #[arg(long, default_value_t = DashboardQuery::DEFAULT_MAX_ROWS as u64, conflicts_with = "no_row_limit")]
    pub max_rows: u64,

    /// Show every matching row
    #[arg(long)]
    pub no_row_limit: bool,

    /// Content characters to keep before truncating
    #[arg(long, default_value_t = DashboardQuery::DEFAULT_MAX_CONTENT_LEN)]
    pub max_content_len: usize,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl DashboardArgs {
    pub fn signed_max_rows(&self) -> i64 {
        if self.no_row_limit {
            -1
        } else {
            i64::try_from(self.max_rows).unwrap_or(i64::MAX)
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExperimentsArgs {
    pub branch: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SummaryArgs {
    pub branch: String,
    pub experiment: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Experiment branch to take the classifier model from
    pub branch: String,

    /// Experiment name within the branch
    pub experiment: String,

    /// Maximum amount of rows to classify
    #[arg(long, default_value_t = 100, conflicts_with = "no_limit")]
    pub limit: u64,

    /// Classify every pending row (may need a lot of memory)
    #[arg(long)]
    pub no_limit: bool,
}

impl ClassifyArgs {
    pub fn signed_limit(&self) -> i64 {
        if self.no_limit {
            -1
        } else {
            i64::try_from(self.limit).unwrap_or(i64::MAX)
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// JSON-lines file, one record per line
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_config() {
        let cli = Cli::try_parse_from([
            "microscope",
            "--local-files-root",
            "/srv/c4v",
            "--db-backend",
            "SQLITE",
            "branches",
        ])
        .unwrap();
        let cfg = cli.global.to_config().unwrap();
        assert_eq!(cfg.experiments_root(), PathBuf::from("/srv/c4v/experiments"));
        assert!(cfg.backend().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_are_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = OsStr::from_bytes(b"/srv/c4v-\xff");
        let cli = Cli::try_parse_from([
            OsStr::new("microscope"),
            OsStr::new("--local-files-root"),
            root,
            OsStr::new("branches"),
        ])
        .unwrap();
        let cfg = cli.global.to_config().unwrap();
        assert_eq!(cfg.local_files_root.as_os_str(), root);
        assert_eq!(cfg.db_path(), PathBuf::from(root).join("c4v_db.sqlite"));
    }

    #[test]
    fn row_limit_flags_conflict() {
        assert!(Cli::try_parse_from([
            "microscope",
            "dashboard",
            "--max-rows",
            "5",
            "--no-row-limit"
        ])
        .is_err());
        let cli = Cli::try_parse_from(["microscope", "dashboard", "--no-row-limit"]).unwrap();
        match cli.cmd {
            Command::Dashboard(args) => assert_eq!(args.signed_max_rows(), -1),
            _ => panic!("expected dashboard"),
        }
    }
}
