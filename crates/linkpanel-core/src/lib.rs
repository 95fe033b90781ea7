pub mod config;
pub mod logging;

pub mod envelope;
pub mod metadata;
pub mod panel;
pub mod registry;
pub mod resolver;
pub mod server;
pub mod upstream;
