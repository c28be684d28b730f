use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporl::cli::{self, ImportArgs};
use sporl::config::{self, Config};

/// Custom ANSI styling for the CLI help/usage text, carried over from the
/// teacher verbatim.
fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Path to the JSON config file (overrides SPORL_CONFIG_PATH and the default)
    #[clap(long, global = true)]
    config: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match a song list against the catalog and build a playlist from the results
    Import(ImportOptions),

    /// Same as `import`, tuned for large song lists
    BatchImport(ImportOptions),

    /// Run the OAuth authorization flow and cache the resulting token
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug)]
pub struct ImportOptions {
    /// Path to the input song list
    pub input_path: String,

    /// Name of the playlist to create from matched tracks
    #[clap(long)]
    pub playlist_name: String,

    /// Make the created playlist public
    #[clap(long)]
    pub public: bool,

    /// Description for the created playlist
    #[clap(long, default_value = "")]
    pub description: String,

    /// Path to write the plain-text report to (stdout if omitted)
    #[clap(long)]
    pub output_report: Option<String>,

    /// Override CONCURRENCY_LIMIT for this run
    #[clap(long)]
    pub concurrency: Option<usize>,

    /// Override BATCH_SIZE for this run
    #[clap(long)]
    pub batch_size: Option<usize>,

    /// Override LOG_LEVEL for this run
    #[clap(long)]
    pub log_level: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CompletionsOption {
    /// The shell to generate completions for
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Cannot load configuration: {e}");
            std::process::exit(1);
        }
    };

    // `--log-level` has to land in `config` before the subscriber is built;
    // `tracing_subscriber`'s global filter is fixed at init time, so applying
    // it any later would silently have no effect.
    if let Command::Import(opt) | Command::BatchImport(opt) = &cli.command {
        if let Some(log_level) = &opt.log_level {
            config.log_level = log_level.clone();
        }
    }
    config::init_logging(&config.log_level);

    let exit_code = match cli.command {
        Command::Import(opt) => run_import(config, opt).await,
        Command::BatchImport(opt) => {
            if opt.concurrency.is_none() {
                config.concurrency_limit = config.concurrency_limit.saturating_mul(2).max(16);
            }
            if opt.batch_size.is_none() {
                config.batch_size = config.batch_size.saturating_mul(4).max(100);
            }
            run_import(config, opt).await
        }
        Command::Auth => match cli::auth(&config).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{e}");
                e.exit_code()
            }
        },
        Command::Completions(_) => unreachable!("handled above"),
    };

    std::process::exit(exit_code);
}

async fn run_import(mut config: Config, opt: ImportOptions) -> i32 {
    if let Some(concurrency) = opt.concurrency {
        config.concurrency_limit = concurrency;
    }
    if let Some(batch_size) = opt.batch_size {
        config.batch_size = batch_size;
    }

    let args = ImportArgs {
        input_path: opt.input_path,
        playlist_name: opt.playlist_name,
        public: opt.public,
        description: opt.description,
        output_report: opt.output_report,
    };

    match cli::import(config, args).await {
        Ok(summary) => {
            if summary.has_partial_failure() {
                3
            } else {
                0
            }
        }
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    }
}
