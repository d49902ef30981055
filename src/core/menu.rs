use crate::core::url_mapper::UrlMapper;
use crate::domain::model::{MenuItem, OrderedMenu};
use crate::domain::payload::RawMenuItem;
use std::collections::HashMap;

/// Editorial order of the header entries.
pub const DEFAULT_MENU_PRIORITY: [&str; 7] = [
    "Servicios",
    "Soluciones",
    "Plataformas",
    "Sectores",
    "Portfolio",
    "Nosotros",
    "Blog",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    priority: Vec<String>,
    mapper: UrlMapper,
}

impl Default for MenuModel {
    fn default() -> Self {
        Self::new(DEFAULT_MENU_PRIORITY, UrlMapper::default())
    }
}

impl MenuModel {
    pub fn new<I, S>(priority: I, mapper: UrlMapper) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            priority: priority.into_iter().map(Into::into).collect(),
            mapper,
        }
    }

    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    /// Keeps only items whose label is in the priority list, in that order.
    ///
    /// Duplicate labels resolve to the last item seen. Children keep the
    /// order they arrived in.
    pub fn build_ordered_menu<I>(&self, raw_items: I) -> OrderedMenu
    where
        I: IntoIterator<Item = MenuItem>,
    {
        let mut by_label: HashMap<String, MenuItem> = HashMap::new();
        for item in raw_items {
            by_label.insert(item.label.clone(), item);
        }

        let ordered = self
            .priority
            .iter()
            .filter_map(|label| by_label.remove(label))
            .map(|item| self.mapper.normalize_menu_tree(item))
            .collect();

        OrderedMenu::from_ordered(ordered)
    }

    pub fn from_payload(&self, raw_items: Vec<RawMenuItem>) -> OrderedMenu {
        self.build_ordered_menu(raw_items.into_iter().map(MenuItem::from))
    }
}

/// [`MenuModel::build_ordered_menu`] with the default priority and hosts.
pub fn build_ordered_menu<I>(raw_items: I) -> OrderedMenu
where
    I: IntoIterator<Item = MenuItem>,
{
    MenuModel::default().build_ordered_menu(raw_items)
}
