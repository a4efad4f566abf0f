mod parsing;
mod settings;
mod types;

pub(crate) use types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, Environment, ImportSettings,
    ListingSettings, RuntimeSettings, Settings, TelemetrySettings,
};
