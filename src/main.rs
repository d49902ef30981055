use clap::Parser;
use ecomm360_web::core::ConfigProvider;
use ecomm360_web::utils::error::ErrorSeverity;
use ecomm360_web::utils::{logger, validation::Validate};
use ecomm360_web::{
    CliConfig, GraphqlGateway, LocalStorage, Result, SiteConfig, SiteEngine, SitePipeline,
};

async fn export<C: ConfigProvider + Validate + 'static>(config: C) -> Result<String> {
    let gateway = GraphqlGateway::from_config(&config)?;
    let storage = LocalStorage::new(config.output_path());
    let pipeline = SitePipeline::new(storage, config, gateway);
    SiteEngine::new(pipeline).run().await
}

fn exit_on_invalid<C: Validate>(config: &C) {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting ecomm360-web content export");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            let site_config = match SiteConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Failed to load {}: {}", path.display(), e);
                    eprintln!("{}", e.user_friendly_message());
                    std::process::exit(1);
                }
            };
            exit_on_invalid(&site_config);
            export(site_config).await
        }
        None => {
            exit_on_invalid(&cli);
            export(cli).await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("Content export completed");
            println!("Content saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Content export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
