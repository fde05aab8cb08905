pub mod app_config;
pub mod config;
pub mod line;
pub mod normalize;
pub mod query;
pub mod response;

pub use app_config::{AppConfig, ConfigError};
pub use config::{load_config, load_config_from_env};
pub use line::{CartLine, LineOption, Product};
pub use normalize::{normalize_cart, normalize_line};
