//! Command-line interface
//!
//! Every option can also come from a `MEDOC_*` environment variable, and
//! most from the TOML config file; the command line wins.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "medoc-ingest")]
#[command(about = "Ingest title metadata into a document store")]
#[command(version)]
pub struct Cli {
    /// TOML config file (default: ~/.config/medoc/config.toml)
    #[arg(long, global = true, env = "MEDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Working folder for the error log when no log directory is set
    #[arg(long, global = true)]
    pub root_folder: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, flatten and store every title in an identifier file
    Run(RunArgs),

    /// List the facets that may be passed to `run --facet`
    Facets,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Identifier file: one title per line, or a CSV export (first column)
    pub ids: PathBuf,

    /// Extra facet to request on top of `main` (repeatable or comma separated)
    #[arg(short, long = "facet", value_delimiter = ',')]
    pub facets: Vec<String>,

    /// Store URI, e.g. sqlite://medoc.db
    #[arg(long, env = "MEDOC_STORE_URI")]
    pub store_uri: Option<String>,

    /// Database namespace
    #[arg(long, env = "MEDOC_NAMESPACE")]
    pub namespace: Option<String>,

    /// Collection inside the namespace
    #[arg(long, env = "MEDOC_COLLECTION")]
    pub collection: Option<String>,

    /// Metadata service base URL
    #[arg(long, env = "MEDOC_PROVIDER_URL", conflicts_with = "provider_dir")]
    pub provider_url: Option<String>,

    /// Directory of tt<id>.json files to read instead of the service
    #[arg(long, env = "MEDOC_PROVIDER_DIR")]
    pub provider_dir: Option<PathBuf>,

    /// Request rate limit for the metadata service
    #[arg(long, env = "MEDOC_REQUESTS_PER_SECOND")]
    pub requests_per_second: Option<u32>,

    /// Worker count (default: one per CPU)
    #[arg(short = 'j', long, env = "MEDOC_WORKERS")]
    pub workers: Option<usize>,

    /// Directory for errors.txt and errors_old.txt
    #[arg(long, env = "MEDOC_ERROR_LOG_DIR")]
    pub error_log_dir: Option<PathBuf>,

    /// Error log size that triggers rotation
    #[arg(long, env = "MEDOC_ERROR_LOG_MAX_BYTES")]
    pub error_log_max_bytes: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    #[serial]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "medoc-ingest",
            "run",
            "ids.csv",
            "--facet",
            "plot",
            "-f",
            "awards,full credits",
            "--store-uri",
            "sqlite://medoc.db",
            "--namespace",
            "imdb",
            "--collection",
            "movies",
            "--provider-dir",
            "mirror",
            "-j",
            "4",
        ])
        .unwrap();

        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.ids, PathBuf::from("ids.csv"));
        assert_eq!(args.facets, vec!["plot", "awards", "full credits"]);
        assert_eq!(args.store_uri.as_deref(), Some("sqlite://medoc.db"));
        assert_eq!(args.provider_dir, Some(PathBuf::from("mirror")));
        assert_eq!(args.workers, Some(4));
    }

    #[test]
    #[serial]
    fn test_provider_sources_conflict() {
        let result = Cli::try_parse_from([
            "medoc-ingest",
            "run",
            "ids.csv",
            "--provider-url",
            "http://localhost",
            "--provider-dir",
            "mirror",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_facets_command() {
        let cli = Cli::try_parse_from(["medoc-ingest", "facets"]).unwrap();
        assert!(matches!(cli.command, Command::Facets));
    }

    #[test]
    #[serial]
    fn test_environment_fills_missing_options() {
        std::env::set_var("MEDOC_NAMESPACE", "from-env");
        std::env::set_var("MEDOC_COLLECTION", "from-env");

        let result = Cli::try_parse_from(["medoc-ingest", "run", "ids.csv", "--collection", "from-cli"]);

        std::env::remove_var("MEDOC_NAMESPACE");
        std::env::remove_var("MEDOC_COLLECTION");

        let Command::Run(args) = result.unwrap().command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.namespace.as_deref(), Some("from-env"));
        assert_eq!(args.collection.as_deref(), Some("from-cli"));
    }
}
