//! WPGraphQL client.
//!
//! Single attempt per query, no retries. Any failure is logged once and
//! surfaced to callers as `None`.

use crate::domain::payload::{
    MenuItemsData, PageByData, PagesData, PostByData, PostsData, RawMenuItem, RawPage, RawPost,
};
use crate::domain::ports::{ConfigProvider, ContentSource};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://web2025.ecomm360.net/graphql";
pub const DEFAULT_MENU_SLUG: &str = "menu-principal";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

pub const GET_MENU_ITEMS: &str = r#"
query GetMenuItems($slug: String!) {
  menus(first: 1, where: { slug: $slug }) {
    edges {
      node {
        menuItems(first: 100) {
          edges {
            node {
              id
              label
              url
              order
              childItems(first: 50) {
                edges {
                  node {
                    id
                    label
                    url
                    order
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

pub const GET_PAGES: &str = r#"
query GetPages {
  pages(first: 100) {
    edges {
      node {
        id
        title
        slug
        content
        excerpt
        featuredImage { node { sourceUrl altText } }
      }
    }
  }
}
"#;

pub const GET_PAGE_BY_SLUG: &str = r#"
query GetPageBySlug($slug: String!) {
  pageBy(uri: $slug) {
    id
    title
    slug
    content
    excerpt
    featuredImage { node { sourceUrl altText } }
  }
}
"#;

pub const GET_POSTS: &str = r#"
query GetPosts {
  posts(first: 100) {
    edges {
      node {
        id
        title
        slug
        excerpt
        content
        date
        author { node { name } }
        featuredImage { node { sourceUrl altText } }
      }
    }
  }
}
"#;

pub const GET_POST_BY_SLUG: &str = r#"
query GetPostBySlug($slug: String!) {
  postBy(slug: $slug) {
    id
    title
    slug
    content
    excerpt
    date
    author { node { name } }
    featuredImage { node { sourceUrl altText } }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

#[derive(Debug, Clone)]
pub struct GraphqlGateway {
    client: Client,
    endpoint: String,
    menu_slug: String,
}

impl GraphqlGateway {
    pub fn new(endpoint: impl Into<String>, menu_slug: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            menu_slug: menu_slug.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.graphql_endpoint(),
            config.menu_slug(),
            config.request_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Raw query. Errors are returned, not logged.
    pub async fn request<T: DeserializeOwned>(
        &self,
        name: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        tracing::debug!("GraphQL {} -> {}", name, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        tracing::debug!("GraphQL {} response status: {}", name, response.status());

        let envelope: GraphqlResponse<T> = response.error_for_status()?.json().await?;

        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SiteError::GraphqlError {
                query: name.to_string(),
                message,
            });
        }

        envelope.data.ok_or_else(|| SiteError::EmptyResponseError {
            query: name.to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        name: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Option<T> {
        match self.request(name, query, variables).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::error!("Error fetching {}: {}", name, e);
                None
            }
        }
    }
}

#[async_trait]
impl ContentSource for GraphqlGateway {
    async fn get_menu_items(&self) -> Option<Vec<RawMenuItem>> {
        self.fetch::<MenuItemsData>(
            "menu items",
            GET_MENU_ITEMS,
            json!({ "slug": self.menu_slug }),
        )
        .await
        .map(MenuItemsData::into_items)
    }

    async fn get_pages(&self) -> Option<Vec<RawPage>> {
        self.fetch::<PagesData>("pages", GET_PAGES, json!({}))
            .await
            .map(|data| data.pages.map(|c| c.into_nodes()).unwrap_or_default())
    }

    async fn get_page_by_slug(&self, slug: &str) -> Option<RawPage> {
        self.fetch::<PageByData>("page", GET_PAGE_BY_SLUG, json!({ "slug": slug }))
            .await
            .and_then(|data| data.page_by)
    }

    async fn get_posts(&self) -> Option<Vec<RawPost>> {
        self.fetch::<PostsData>("posts", GET_POSTS, json!({}))
            .await
            .map(|data| data.posts.map(|c| c.into_nodes()).unwrap_or_default())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Option<RawPost> {
        self.fetch::<PostByData>("post", GET_POST_BY_SLUG, json!({ "slug": slug }))
            .await
            .and_then(|data| data.post_by)
    }
}
