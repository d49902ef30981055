// Domain layer: models, wire payloads and ports. No I/O here.

pub mod model;
pub mod payload;
pub mod ports;
