use crate::domain::model::{SiteContent, SiteSnapshot};
use crate::domain::payload::{RawMenuItem, RawPage, RawPost};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn graphql_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn menu_slug(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn excerpt_length(&self) -> usize;
    fn content_hosts(&self) -> &[String];
    fn menu_priority(&self) -> &[String];
    /// Header compaction threshold in px.
    fn scroll_threshold(&self) -> f64;
}

/// Fail-soft content backend: `None` means "no content available" and has
/// already been logged.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn get_menu_items(&self) -> Option<Vec<RawMenuItem>>;
    async fn get_pages(&self) -> Option<Vec<RawPage>>;
    async fn get_page_by_slug(&self, slug: &str) -> Option<RawPage>;
    async fn get_posts(&self) -> Option<Vec<RawPost>>;
    async fn get_post_by_slug(&self, slug: &str) -> Option<RawPost>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SiteContent>;
    async fn transform(&self, content: SiteContent) -> Result<SiteSnapshot>;
    async fn load(&self, snapshot: SiteSnapshot) -> Result<String>;
}
