use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use hgdash::{AppConfig, RepositoryManager};

fn print_usage() {
    eprintln!("Usage: hgdash [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --static            Serve the document root only (no API endpoints)");
    eprintln!("  --config <FILE>     Configuration file (default: <config dir>/hgdash/hgdash.toml)");
    eprintln!("  --host <HOST>       Bind address (default: 127.0.0.1)");
    eprintln!("  --root <DIR>        Document root (default: web)");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("The listening port is taken from the PORT environment variable (default: 3000).");
}

/// Command-line options.
#[derive(Debug, Default)]
struct Options {
    static_only: bool,
    config: Option<PathBuf>,
    host: Option<String>,
    root: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--static" => options.static_only = true,
            "--config" | "--host" | "--root" => {
                let flag = args[i].as_str();
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| format!("{flag} requires a value"))?;
                match flag {
                    "--config" => options.config = Some(PathBuf::from(value)),
                    "--host" => options.host = Some(value.clone()),
                    _ => options.root = Some(PathBuf::from(value)),
                }
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Some(options))
}

#[tokio::main]
async fn main() -> hgdash::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            std::process::exit(2);
        }
    };

    let mut config = AppConfig::load(options.config.as_deref())?;
    if let Some(host) = options.host {
        config.server.host = host;
    }
    if let Some(root) = options.root {
        config.server.web_root = root;
    }

    let result = if options.static_only {
        hgdash::run_static(&config.server).await
    } else {
        hgdash::run_server(&config, Arc::new(RepositoryManager::new())).await
    };

    if let Err(e) = &result {
        log::error!("Server error: {e}");
    }
    result
}
