pub mod config;
pub mod config_loader;
pub mod stats;
pub mod timeframe;

pub use config::{
    AnalyticsConfig, AppConfig, DatabaseConfig, IngestConfig, LiveStatsConfig, ServerConfig,
};
pub use config_loader::ConfigLoader;
pub use stats::{
    adf_test, ols, pearson_correlation, standard_normal_cdf, AdfResult, CriticalValues, OlsFit,
};
pub use timeframe::Timeframe;
