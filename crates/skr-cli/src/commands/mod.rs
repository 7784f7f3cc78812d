use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;
use tracing::info;

use skr_config::ConfigLoader;
use skr_core::SkrError;

mod http;
mod list;
mod system;
mod validate;

/// skr: Agent Skills resolver and registry
#[derive(Parser)]
#[command(name = "skr", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing skr/config.yaml (default: platform config dir, or $SKR_CONFIG_HOME)
    #[arg(long, global = true)]
    config_home: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List Agent Skills installed in the current context
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Additional skill directory to search (repeatable)
        #[arg(long = "extra", value_name = "DIR")]
        extra: Vec<PathBuf>,
    },
    /// Validate an Agent Skill definition
    Validate {
        /// Skill directory or SKILL.md file
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show the merged configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Skills registry over HTTP
    Http {
        #[command(subcommand)]
        action: HttpAction,
    },
    /// Manage the local artifact store
    System {
        #[command(subcommand)]
        action: SystemAction,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum HttpAction {
    /// Serve the registry UI, aggregating the store on every request
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
        /// OCI layout directory (default: system store)
        #[arg(long)]
        oci_path: Option<PathBuf>,
        /// Allow cross-origin requests
        #[arg(long)]
        cors: bool,
        /// Per-tag fetch timeout in seconds
        #[arg(long, default_value_t = 10)]
        fetch_timeout: u64,
    },
    /// Write the registry UI and a skills.json snapshot for static hosting
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "build/http")]
        output: PathBuf,
        /// OCI layout directory (default: system store)
        #[arg(long)]
        oci_path: Option<PathBuf>,
        /// Per-tag fetch timeout in seconds
        #[arg(long, default_value_t = 10)]
        fetch_timeout: u64,
    },
}

#[derive(Subcommand)]
enum SystemAction {
    /// Remove a skill artifact from the store
    Rm {
        /// Tag reference, e.g. ghcr.io/acme/pdf:1.0.0
        reference: String,
        /// OCI layout directory (default: system store)
        #[arg(long)]
        oci_path: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> skr_core::Result<()> {
        self.init_logging();

        let loader = ConfigLoader::new(ConfigLoader::resolve_config_root(
            self.config_home.as_deref(),
        ));

        match self.command {
            Commands::List { json, extra } => list::cmd_list(&loader, &extra, json),
            Commands::Validate { path } => validate::cmd_validate(&path),
            Commands::Config { json } => Self::cmd_config(&loader, json),
            Commands::Http { action } => http::cmd_http(action).await,
            Commands::System { action } => system::cmd_system(action).await,
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    /// Resolve log level: --verbose > --quiet > --log-level > info. RUST_LOG wins over all.
    fn log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or("info")
        }
    }

    fn init_logging(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(self.log_level()));

        match self.log_format {
            LogFormat::Json => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .with_target(true)
                .init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init(),
        }
    }

    fn cmd_config(loader: &ConfigLoader, json: bool) -> skr_core::Result<()> {
        let cwd = std::env::current_dir()?;
        let config = loader.load_merged(&cwd)?;
        info!(global = %loader.global_path().display(), "merged configuration");

        let rendered = if json {
            serde_json::to_string_pretty(&config)?
        } else {
            config
                .to_yaml()
                .map_err(|e| SkrError::Encode(e.to_string()))?
        };
        println!("{}", rendered.trim_end());
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> skr_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "skr", &mut std::io::stdout());
        Ok(())
    }
}
