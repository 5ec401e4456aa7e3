//! cf-shell binary.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use cf_shell::{
    App, ConfigSource, InlineRenderer, Result, ShellConfig, ShellError, StdinSource, TerminalSetup,
    logging,
};

/// Interactive shell for a few Cloudflare-style commands.
///
/// Type `help` for the command list. Ctrl+C, or Ctrl+D on an empty line, exits.
#[derive(Debug, Parser)]
#[command(name = "cf-shell", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "CF_SHELL_CONFIG")]
    config: Option<PathBuf>,

    /// Append logs to this file (overrides the config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cf-shell: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let (config, source) = ShellConfig::load(args.config.as_deref())?;

    let log_file = args.log_file.as_deref().or(config.logging.file.as_deref());
    let level = if args.debug { "debug" } else { config.logging.level.as_str() };
    logging::init(log_file, level)?;
    logging::install_panic_hook();

    info!("starting cf-shell v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "loaded configuration"),
        ConfigSource::Defaults => info!("using default configuration"),
    }

    // Restored on drop, before any error reaches stderr
    let mut terminal = TerminalSetup::enter()?;

    let renderer = InlineRenderer::new(config.display, config.theme);
    let source = StdinSource::spawn().map_err(ShellError::Terminal)?;
    let mut app = App::new(renderer, source, io::stdout());
    let result = app.run();

    drop(app);
    let restored = terminal.restore();
    let reason = result?;
    info!(?reason, "exiting");
    restored.map_err(ShellError::Terminal)
}
