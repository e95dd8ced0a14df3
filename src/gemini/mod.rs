//! Remote model access for the computer-use loop
//!
//! The loop only needs one stateless call: full history plus tool
//! declarations in, one model turn out. [`GenerativeModel`] is that seam;
//! [`GeminiClient`] implements it over the public REST API.

mod client;
mod types;

pub use client::{GeminiClient, GenerativeModel};
pub use types::{
    Blob, ComputerUse, Content, Environment, FunctionCall, FunctionResponse, FunctionResponsePart,
    Part, Role, Tool,
};

use thiserror::Error;

/// Error type for model calls
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode model response: {0}")]
    Decode(String),

    #[error("Model returned no candidate content (finish reason: {0})")]
    EmptyCandidate(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
