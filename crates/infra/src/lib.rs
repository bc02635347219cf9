//! Infrastructure layer: configuration, storage and the application services
//! that compose the guard with visibility scoping.

pub mod config;
pub mod services;
pub mod store;


pub use config::{ConfigError, EngineConfig};
pub use services::{AccessEngine, Services, ServiceError};
