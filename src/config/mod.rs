mod gateway;

pub use gateway::{DEFAULT_CONFIG_PATHS, GatewayConfig};
