mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseProviderSetting, DatabaseSettings, ExtractionSettings, LoggingSettings,
    ServerSettings, Settings, StorageProviderSetting, StorageSettings, TranscoderSettings,
    UpstreamSettings,
};
