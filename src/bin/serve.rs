use clap::Parser;
use ecomm360_web::config::toml_config::ServerConfig;
use ecomm360_web::utils::logger::{self, LogFormat};
use ecomm360_web::utils::validation::{self, Validate};
use ecomm360_web::{SiteConfig, SiteRoot, StaticServer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "serve")]
#[command(about = "Serve the built site with single-page-app fallback")]
struct Args {
    /// Directory holding the built site
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Optional site.toml; HOST and PORT still take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn server_config(args: &Args) -> ecomm360_web::Result<ServerConfig> {
    let mut server = match &args.config {
        Some(path) => {
            let config = SiteConfig::from_file(path)?;
            config.validate()?;
            config.server
        }
        None => ServerConfig::default(),
    };

    if let Some(dir) = &args.dir {
        server.site_dir = dir.clone();
    }
    server.apply_env_overrides()?;

    validation::validate_range("PORT", server.port, 1, u16::MAX)?;
    Ok(server)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(args.verbose, format);

    let server = match server_config(&args) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let site = SiteRoot::new(server.site_dir.clone(), server.entry_document.clone());
    let static_server = StaticServer::bind(server.ip()?, server.port, site)?;
    static_server.run();

    Ok(())
}
