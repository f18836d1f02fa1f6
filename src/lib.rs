//! `gemini-http` is an async client for the Gemini `generateContent` API.
//!
//! One logical request is retried with exponential backoff plus jitter until
//! it succeeds or the retry budget runs out:
//! - [`GeminiClient::generate`] always yields text, using
//!   [`FALLBACK_MESSAGE`] once retries are exhausted
//! - [`GeminiClient::try_generate`] surfaces the terminal [`GeminiError`]
//! - [`GeminiClient::explain_project`] builds a plain-language project
//!   explanation prompt from a [`ProjectBrief`]

mod backoff;
mod client;
mod decode;
mod error;
mod options;
mod prompt;
mod wire;

pub use backoff::backoff_delay;
pub use client::{model_to_endpoint, GeminiClient, DEFAULT_MODEL, FALLBACK_MESSAGE};
pub use error::GeminiError;
pub use options::ClientOptions;
pub use prompt::{explanation_prompt, ProjectBrief};

#[cfg(not(target_arch = "wasm32"))]
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, GeminiError>;
