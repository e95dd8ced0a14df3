use thiserror::Error;

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{field} cannot exceed {max}ms. Received: {value}ms")]
    TimeoutTooLong {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("Screen size must be non-zero. Received: {width}x{height}")]
    InvalidScreen { width: u32, height: u32 },

    #[error("turn_limit must be at least 1")]
    InvalidTurnLimit,
}
