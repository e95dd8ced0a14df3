pub mod constants;
mod errors;
mod timeout;

pub use errors::ConfigError;
pub use timeout::{
    MAX_REQUEST_TIMEOUT_MS, MAX_SETTLE_TIMEOUT_MS, MAX_TYPING_DELAY_MS, validate_wait,
};
