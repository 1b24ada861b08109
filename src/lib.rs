//! HTTP control surface for a display layout engine.

pub mod config;
pub mod control;
pub mod http;
pub mod layout;
pub mod lifecycle;
pub mod observability;
pub mod playlist;

pub use config::schema::ServerConfig;
pub use control::ControlGateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
