pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SiteConfig;

pub use adapters::graphql::GraphqlGateway;
pub use adapters::server::{SiteRoot, StaticServer};
pub use adapters::storage::LocalStorage;
pub use core::{engine::SiteEngine, pipeline::SitePipeline};
pub use utils::error::{Result, SiteError};
