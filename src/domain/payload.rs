//! Wire shapes of the WPGraphQL responses.
//!
//! Every field is optional: WordPress omits or nulls fields freely, and the
//! conversion into domain types decides the defaults in one place instead of
//! at every access site.

use serde::{Deserialize, Serialize};

/// Relay-style `{ edges: [{ node }] }` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    pub edges: Option<Vec<Edge<T>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

impl<T> Connection<T> {
    pub fn from_nodes(nodes: Vec<T>) -> Self {
        Self {
            edges: Some(nodes.into_iter().map(|node| Edge { node: Some(node) }).collect()),
        }
    }

    /// Nodes in payload order, skipping null edges.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| edge.node)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenuItem {
    pub id: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub order: Option<i64>,
    pub child_items: Option<Connection<RawMenuItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenu {
    pub menu_items: Option<Connection<RawMenuItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAuthor {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPage {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<Edge<RawImage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub author: Option<Edge<RawAuthor>>,
    pub featured_image: Option<Edge<RawImage>>,
}

// Query roots

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemsData {
    pub menus: Option<Connection<RawMenu>>,
}

impl MenuItemsData {
    /// Top-level items of the first matching menu.
    pub fn into_items(self) -> Vec<RawMenuItem> {
        self.menus
            .map(Connection::into_nodes)
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|menu| menu.menu_items)
            .map(Connection::into_nodes)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagesData {
    pub pages: Option<Connection<RawPage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageByData {
    pub page_by: Option<RawPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostsData {
    pub posts: Option<Connection<RawPost>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostByData {
    pub post_by: Option<RawPost>,
}
