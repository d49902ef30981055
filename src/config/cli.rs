use crate::adapters::graphql::{DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_MENU_SLUG, DEFAULT_TIMEOUT_SECONDS};
use crate::core::menu::DEFAULT_MENU_PRIORITY;
use crate::core::navigation::DEFAULT_SCROLL_THRESHOLD;
use crate::core::url_mapper::DEFAULT_CONTENT_HOSTS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_content_hosts() -> Vec<String> {
    DEFAULT_CONTENT_HOSTS.iter().map(|h| h.to_string()).collect()
}

fn default_menu_priority() -> Vec<String> {
    DEFAULT_MENU_PRIORITY.iter().map(|l| l.to_string()).collect()
}

/// Export CLI. When `--config` is given the TOML file drives the run and
/// the remaining flags are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ecomm360-web")]
#[command(about = "Fetch, normalize and export eComm360 WordPress content")]
pub struct CliConfig {
    #[arg(long, env = "GRAPHQL_ENDPOINT", default_value = DEFAULT_GRAPHQL_ENDPOINT)]
    pub graphql_endpoint: String,

    #[arg(long, default_value = "./content")]
    pub output_path: String,

    #[arg(long, help = "Path to a site.toml configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_MENU_SLUG)]
    pub menu_slug: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = crate::core::normalizer::DEFAULT_EXCERPT_LENGTH)]
    pub excerpt_length: usize,

    #[arg(long, default_value_t = DEFAULT_SCROLL_THRESHOLD)]
    pub scroll_threshold: f64,

    #[arg(long, value_delimiter = ',', default_values_t = default_content_hosts())]
    pub content_hosts: Vec<String>,

    #[arg(long, value_delimiter = ',', default_values_t = default_menu_priority())]
    pub menu_priority: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn graphql_endpoint(&self) -> &str {
        &self.graphql_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn menu_slug(&self) -> &str {
        &self.menu_slug
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn excerpt_length(&self) -> usize {
        self.excerpt_length
    }

    fn content_hosts(&self) -> &[String] {
        &self.content_hosts
    }

    fn menu_priority(&self) -> &[String] {
        &self.menu_priority
    }

    fn scroll_threshold(&self) -> f64 {
        self.scroll_threshold
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("graphql_endpoint", &self.graphql_endpoint)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("menu_slug", &self.menu_slug)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validation::validate_positive_number("excerpt_length", self.excerpt_length, 1)?;
        validation::validate_scroll_threshold("scroll_threshold", self.scroll_threshold)?;

        for host in &self.content_hosts {
            validation::validate_host("content_hosts", host)?;
        }
        for label in &self.menu_priority {
            validation::validate_non_empty_string("menu_priority", label)?;
        }

        if let Some(path) = &self.config {
            validation::validate_path("config", &path.to_string_lossy())?;
        }

        Ok(())
    }
}
