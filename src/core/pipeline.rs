use crate::core::menu::MenuModel;
use crate::core::normalizer::{
    extract_plain_text, normalize_numeric_entities, strip_legacy_shortcodes, truncate_excerpt,
};
use crate::core::url_mapper::UrlMapper;
use crate::core::{ConfigProvider, ContentSource, Pipeline, SiteContent, SiteSnapshot, Storage};
use crate::domain::model::{FeaturedImage, NormalizedContent, RenderedPage, RenderedPost};
use crate::domain::payload::{Edge, RawImage, RawPage, RawPost};
use crate::utils::error::Result;
use chrono::{DateTime, NaiveDateTime};

pub const MENU_FILE: &str = "menu.json";
pub const PAGES_FILE: &str = "pages.json";
pub const POSTS_FILE: &str = "posts.json";

/// Fetches site content, normalizes it and writes one JSON file per
/// collection.
pub struct SitePipeline<S: Storage, C: ConfigProvider, G: ContentSource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: G,
    menu_model: MenuModel,
}

impl<S: Storage, C: ConfigProvider, G: ContentSource> SitePipeline<S, C, G> {
    pub fn new(storage: S, config: C, source: G) -> Self {
        let mapper = UrlMapper::new(config.content_hosts().iter().cloned());
        let menu_model = MenuModel::new(config.menu_priority().iter().cloned(), mapper);
        Self {
            storage,
            config,
            source,
            menu_model,
        }
    }

    pub fn menu_model(&self) -> &MenuModel {
        &self.menu_model
    }
}

/// WordPress titles come HTML-escaped and texturized.
fn plain_title(raw: Option<String>) -> String {
    extract_plain_text(&normalize_numeric_entities(&raw.unwrap_or_default()))
}

/// Prefers the editor-written excerpt, falls back to one cut from the body.
fn choose_excerpt(raw_excerpt: Option<String>, content: &NormalizedContent, max_length: usize) -> String {
    let written = extract_plain_text(&strip_legacy_shortcodes(&raw_excerpt.unwrap_or_default()));
    if written.is_empty() {
        content.excerpt.clone()
    } else {
        truncate_excerpt(&written, max_length)
    }
}

fn featured_image(raw: Option<Edge<RawImage>>) -> Option<FeaturedImage> {
    let image = raw?.node?;
    let url = image.source_url.filter(|url| !url.is_empty())?;
    Some(FeaturedImage {
        url,
        alt: image.alt_text.unwrap_or_default(),
    })
}

/// WPGraphQL dates are site-local without offset; RFC 3339 is accepted too.
pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

pub fn render_page(raw: RawPage, excerpt_length: usize) -> RenderedPage {
    let content = NormalizedContent::from_html(&raw.content.unwrap_or_default(), excerpt_length);
    let excerpt = choose_excerpt(raw.excerpt, &content, excerpt_length);
    RenderedPage {
        id: raw.id.unwrap_or_default(),
        title: plain_title(raw.title),
        slug: raw.slug.unwrap_or_default(),
        content,
        excerpt,
        featured_image: featured_image(raw.featured_image),
    }
}

pub fn render_post(raw: RawPost, excerpt_length: usize) -> RenderedPost {
    let content = NormalizedContent::from_html(&raw.content.unwrap_or_default(), excerpt_length);
    let excerpt = choose_excerpt(raw.excerpt, &content, excerpt_length);
    let date = raw.date.as_deref().and_then(parse_post_date);
    if date.is_none() && raw.date.is_some() {
        tracing::warn!("Unparseable post date {:?} for '{:?}'", raw.date, raw.slug);
    }
    RenderedPost {
        id: raw.id.unwrap_or_default(),
        title: plain_title(raw.title),
        slug: raw.slug.unwrap_or_default(),
        content,
        excerpt,
        date,
        author: raw.author.and_then(|a| a.node).and_then(|a| a.name),
        featured_image: featured_image(raw.featured_image),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, G: ContentSource> Pipeline for SitePipeline<S, C, G> {
    async fn extract(&self) -> Result<SiteContent> {
        let (menu_items, pages, posts) = tokio::join!(
            self.source.get_menu_items(),
            self.source.get_pages(),
            self.source.get_posts()
        );

        if menu_items.is_none() {
            tracing::warn!("No menu from content source, header will render empty");
        }
        if pages.is_none() {
            tracing::warn!("No pages from content source");
        }
        if posts.is_none() {
            tracing::warn!("No posts from content source");
        }

        Ok(SiteContent {
            menu_items: menu_items.unwrap_or_default(),
            pages: pages.unwrap_or_default(),
            posts: posts.unwrap_or_default(),
        })
    }

    async fn transform(&self, content: SiteContent) -> Result<SiteSnapshot> {
        let excerpt_length = self.config.excerpt_length();

        let menu = self.menu_model.from_payload(content.menu_items);
        tracing::debug!("Menu order: {:?}", menu.labels());

        let pages = content
            .pages
            .into_iter()
            .map(|raw| render_page(raw, excerpt_length))
            .collect();
        let posts = content
            .posts
            .into_iter()
            .map(|raw| render_post(raw, excerpt_length))
            .collect();

        Ok(SiteSnapshot { menu, pages, posts })
    }

    async fn load(&self, snapshot: SiteSnapshot) -> Result<String> {
        let files = [
            (MENU_FILE, serde_json::to_vec_pretty(&snapshot.menu)?),
            (PAGES_FILE, serde_json::to_vec_pretty(&snapshot.pages)?),
            (POSTS_FILE, serde_json::to_vec_pretty(&snapshot.posts)?),
        ];

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes) to storage", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
