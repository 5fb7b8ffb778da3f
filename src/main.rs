use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use wsl_delegate::cli::{self, Opt};
use wsl_delegate::config::{Config, LOG_ENV};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let registry = cli::options();
    let raw = cli::raw_invocation(env::args().skip(1));
    let invocation = match registry.tokenize(&raw) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("{e}");
            println!("{}", cli::HELP_TEXT);
            std::process::exit(cli::EXIT_USAGE);
        }
    };
    init_logging(invocation.contains(Opt::Verbose));

    let config = Config::from_env();
    let code = cli::run(&config, &registry, &invocation, &raw)?;
    std::process::exit(code);
}
