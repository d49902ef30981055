use crate::adapters::graphql::{DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_MENU_SLUG, DEFAULT_TIMEOUT_SECONDS};
use crate::adapters::server::{DEFAULT_ENTRY_DOCUMENT, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SITE_DIR};
use crate::core::menu::DEFAULT_MENU_PRIORITY;
use crate::core::navigation::DEFAULT_SCROLL_THRESHOLD;
use crate::core::normalizer::DEFAULT_EXCERPT_LENGTH;
use crate::core::url_mapper::DEFAULT_CONTENT_HOSTS;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("ENV_PLACEHOLDER regex should compile")
});

/// `site.toml`. Every section may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub content: ContentConfig,
    pub urls: UrlsConfig,
    pub menu: MenuConfig,
    pub navigation: NavigationConfig,
    pub excerpt: ExcerptConfig,
    pub server: ServerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub graphql_endpoint: String,
    pub menu_slug: String,
    pub timeout_seconds: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            menu_slug: DEFAULT_MENU_SLUG.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlsConfig {
    pub content_hosts: Vec<String>,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            content_hosts: DEFAULT_CONTENT_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub priority: Vec<String>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_MENU_PRIORITY.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub scroll_threshold: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    pub max_length: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub site_dir: PathBuf,
    pub entry_document: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            entry_document: DEFAULT_ENTRY_DOCUMENT.to_string(),
        }
    }
}

impl ServerConfig {
    /// `HOST` / `PORT` from the environment win over the file.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port.parse().map_err(|_| SiteError::InvalidConfigValueError {
                field: "PORT".to_string(),
                value: port.clone(),
                reason: "Port must be a number between 1 and 65535".to_string(),
            })?;
        }
        Ok(())
    }

    pub fn ip(&self) -> Result<IpAddr> {
        self.host
            .parse()
            .map_err(|_| SiteError::InvalidConfigValueError {
                field: "server.host".to_string(),
                value: self.host.clone(),
                reason: "Host must be an IP address".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./content".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay verbatim.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("content.graphql_endpoint", &self.content.graphql_endpoint)?;
        validation::validate_non_empty_string("content.menu_slug", &self.content.menu_slug)?;
        validation::validate_range("content.timeout_seconds", self.content.timeout_seconds, 1, 300)?;

        for host in &self.urls.content_hosts {
            validation::validate_host("urls.content_hosts", host)?;
        }

        if self.menu.priority.is_empty() {
            return Err(SiteError::MissingConfigError {
                field: "menu.priority".to_string(),
            });
        }
        for label in &self.menu.priority {
            validation::validate_non_empty_string("menu.priority", label)?;
        }

        validation::validate_scroll_threshold(
            "navigation.scroll_threshold",
            self.navigation.scroll_threshold,
        )?;

        validation::validate_positive_number("excerpt.max_length", self.excerpt.max_length, 1)?;

        self.server.ip()?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validation::validate_path(
            "server.site_dir",
            &self.server.site_dir.to_string_lossy(),
        )?;
        validation::validate_non_empty_string("server.entry_document", &self.server.entry_document)?;

        validation::validate_path("output.path", &self.output.path)?;

        Ok(())
    }
}

impl ConfigProvider for SiteConfig {
    fn graphql_endpoint(&self) -> &str {
        &self.content.graphql_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn menu_slug(&self) -> &str {
        &self.content.menu_slug
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.content.timeout_seconds)
    }

    fn excerpt_length(&self) -> usize {
        self.excerpt.max_length
    }

    fn content_hosts(&self) -> &[String] {
        &self.urls.content_hosts
    }

    fn menu_priority(&self) -> &[String] {
        &self.menu.priority
    }

    fn scroll_threshold(&self) -> f64 {
        self.navigation.scroll_threshold
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
