//! Concrete implementations of the domain ports: the WordPress GraphQL
//! content source, local file storage and the static site server.

pub mod graphql;
pub mod server;
pub mod storage;
