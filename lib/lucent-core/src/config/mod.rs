#[allow(clippy::module_inception)]
mod config;
mod config_serializer;

pub use config::*;
pub use config_serializer::serialize_config;
