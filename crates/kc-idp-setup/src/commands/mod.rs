//! Command implementations.

pub mod configure;
pub mod render;
pub mod urls;

pub use configure::run_configure;
pub use render::run_render;
pub use urls::run_urls;

use crate::config::SetupConfig;
use crate::config_map::ConfigurationMapService;

/// Builds the configuration map service for the loaded config.
pub fn map_service(config: &SetupConfig) -> ConfigurationMapService {
    ConfigurationMapService::new(config.webapp_url.clone(), &config.keycloak)
}
