use crate::domain::payload::{RawMenuItem, RawPage, RawPost};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Navigation entry. `children` is at most one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub url: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url: url.into(),
            order: 0,
            children: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.children.clear();
                child
            })
            .collect();
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl From<RawMenuItem> for MenuItem {
    /// Missing fields become empty strings / order 0; the url is left raw
    /// here and resolved to `#` by the url mapper. Grandchildren are dropped.
    fn from(raw: RawMenuItem) -> Self {
        let children = raw
            .child_items
            .map(|connection| connection.into_nodes())
            .unwrap_or_default()
            .into_iter()
            .map(|child| MenuItem {
                id: child.id.unwrap_or_default(),
                label: child.label.unwrap_or_default(),
                url: child.url.unwrap_or_default(),
                order: child.order.unwrap_or_default(),
                children: Vec::new(),
            })
            .collect();

        MenuItem {
            id: raw.id.unwrap_or_default(),
            label: raw.label.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            order: raw.order.unwrap_or_default(),
            children,
        }
    }
}

/// Top-level menu filtered and ordered by editorial priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedMenu(Vec<MenuItem>);

impl OrderedMenu {
    pub(crate) fn from_ordered(items: Vec<MenuItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MenuItem> {
        self.0.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|item| item.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.0.iter().find(|item| item.id == id)
    }

    pub fn has_submenu(&self, id: &str) -> bool {
        self.get(id).is_some_and(MenuItem::has_children)
    }

    pub fn into_items(self) -> Vec<MenuItem> {
        self.0
    }
}

impl<'a> IntoIterator for &'a OrderedMenu {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContent {
    pub cleaned_html: String,
    pub plain_text: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: NormalizedContent,
    pub excerpt: String,
    pub featured_image: Option<FeaturedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: NormalizedContent,
    pub excerpt: String,
    pub date: Option<NaiveDateTime>,
    pub author: Option<String>,
    pub featured_image: Option<FeaturedImage>,
}

/// Raw payloads gathered by the extract phase.
#[derive(Debug, Clone, Default)]
pub struct SiteContent {
    pub menu_items: Vec<RawMenuItem>,
    pub pages: Vec<RawPage>,
    pub posts: Vec<RawPost>,
}

/// Normalized structures handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub menu: OrderedMenu,
    pub pages: Vec<RenderedPage>,
    pub posts: Vec<RenderedPost>,
}
