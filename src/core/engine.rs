use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct SiteEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SiteEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting content export...");

        tracing::info!("Fetching content...");
        let content = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} menu items, {} pages, {} posts",
            content.menu_items.len(),
            content.pages.len(),
            content.posts.len()
        );

        tracing::info!("Normalizing content...");
        let snapshot = self.pipeline.transform(content).await?;
        tracing::info!(
            "Normalized menu ({} entries), {} pages, {} posts",
            snapshot.menu.len(),
            snapshot.pages.len(),
            snapshot.posts.len()
        );

        tracing::info!("Writing content...");
        let output_path = self.pipeline.load(snapshot).await?;
        tracing::info!("Content saved to: {}", output_path);

        Ok(output_path)
    }
}
