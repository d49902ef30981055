//! Rewrites links that point at the WordPress backend into site-relative paths.

use crate::domain::model::MenuItem;
use url::Url;

pub const DEFAULT_CONTENT_HOSTS: [&str; 2] = ["web2025.ecomm360.net", "www.ecomm360.es"];

/// Placeholder link target for items without a url.
pub const FALLBACK_URL: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapper {
    content_hosts: Vec<String>,
}

impl Default for UrlMapper {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_HOSTS)
    }
}

impl UrlMapper {
    pub fn new<I, S>(content_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content_hosts: content_hosts
                .into_iter()
                .map(|host| host.into().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn content_hosts(&self) -> &[String] {
        &self.content_hosts
    }

    pub fn is_content_host(&self, host: &str) -> bool {
        self.content_hosts
            .iter()
            .any(|known| known.eq_ignore_ascii_case(host))
    }

    /// Query string and fragment of backend urls are dropped.
    pub fn normalize_url(&self, url: Option<&str>) -> String {
        let url = match url {
            Some(url) if !url.is_empty() => url,
            _ => return FALLBACK_URL.to_string(),
        };

        if url.starts_with('/') {
            return url.to_string();
        }

        match Url::parse(url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) if self.is_content_host(host) => parsed.path().to_string(),
                _ => url.to_string(),
            },
            Err(_) => url.to_string(),
        }
    }

    /// Normalizes the item and its immediate children. Grandchildren are
    /// dropped, so the result is always at most one level deep.
    pub fn normalize_menu_tree(&self, item: MenuItem) -> MenuItem {
        let children = item
            .children
            .into_iter()
            .map(|child| MenuItem {
                url: self.normalize_url(Some(&child.url)),
                children: Vec::new(),
                ..child
            })
            .collect();

        MenuItem {
            url: self.normalize_url(Some(&item.url)),
            children,
            ..item
        }
    }

    pub fn normalize_menu_items(&self, items: Vec<MenuItem>) -> Vec<MenuItem> {
        items
            .into_iter()
            .map(|item| self.normalize_menu_tree(item))
            .collect()
    }
}

/// [`UrlMapper::normalize_url`] with the default content hosts.
pub fn normalize_url(url: Option<&str>) -> String {
    UrlMapper::default().normalize_url(url)
}

pub fn normalize_menu_tree(item: MenuItem) -> MenuItem {
    UrlMapper::default().normalize_menu_tree(item)
}
