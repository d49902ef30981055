pub mod engine;
pub mod menu;
pub mod navigation;
pub mod normalizer;
pub mod pipeline;
pub mod url_mapper;

pub use crate::domain::model::{
    MenuItem, NormalizedContent, OrderedMenu, RenderedPage, RenderedPost, SiteContent,
    SiteSnapshot,
};
pub use crate::domain::ports::{ConfigProvider, ContentSource, Pipeline, Storage};
pub use crate::utils::error::Result;
