use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header;

#[cfg(not(target_arch = "wasm32"))]
use tokio_util::sync::CancellationToken;

use crate::{
    backoff,
    decode::decode_generated_text,
    prompt::{explanation_prompt, ProjectBrief},
    wire::GenerateRequest,
    ClientOptions, GeminiError, Result,
};

/// Returned by [`GeminiClient::generate`] once every attempt has failed.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't generate an explanation right now. Please try again later.";

/// Model used by [`GeminiClient::new`].
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

const MODELS_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Cancellation needs tokio-util, which is native-only. On wasm32 the signal
// type is uninhabited so the retry loop can stay target independent.
#[cfg(not(target_arch = "wasm32"))]
type CancelSignal = CancellationToken;
#[cfg(target_arch = "wasm32")]
type CancelSignal = std::convert::Infallible;

/// Formats a model name into its `generateContent` URL.
///
/// Example: `"gemini-pro"` → `"https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"`
pub fn model_to_endpoint(model: &str) -> String {
    format!("{MODELS_BASE_URL}/{}:generateContent", model.trim())
}

#[derive(Clone)]
/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Every failure (transport, non-success status, unexpected body) is retried
/// with exponential backoff and jitter until [`ClientOptions::max_retries`] is
/// used up.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    options: ClientOptions,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client for [`DEFAULT_MODEL`].
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_model(DEFAULT_MODEL, api_key)
    }

    /// Creates a client for a named model, e.g. `"gemini-1.5-flash"`.
    pub fn from_model(model: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(model_to_endpoint(model.as_ref()), api_key)
    }

    /// Creates a client posting to a full endpoint URL.
    ///
    /// Useful for proxies and test servers. The API key is sent as the `key`
    /// query parameter; an empty key sends none.
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into().trim().to_owned(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `GEMINI_API_KEY` — required
    /// - `GEMINI_MODEL` — optional, defaults to [`DEFAULT_MODEL`]
    ///
    /// **Not available on `wasm32` targets**; pass the key to
    /// [`GeminiClient::new`] instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gemini_http::GeminiClient;
    ///
    /// let client = GeminiClient::from_env().expect("missing GEMINI_API_KEY");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| "missing GEMINI_API_KEY environment variable".to_owned())?;
        if api_key.trim().is_empty() {
            return Err("GEMINI_API_KEY is set but empty".to_owned());
        }
        let model = std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        Ok(Self::from_model(model, api_key))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Overrides only the retry count.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.options.max_retries = max_retries;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generates text for `prompt`, falling back to [`FALLBACK_MESSAGE`].
    ///
    /// Never fails: once retries are exhausted the fallback is returned in
    /// place of the error.
    pub async fn generate(&self, prompt: &str) -> String {
        into_text_or_fallback(self.try_generate(prompt).await)
    }

    /// Generates text for `prompt`, surfacing the terminal error.
    ///
    /// Exhaustion is reported as [`GeminiError::RetryExhausted`] wrapping the
    /// error of the final attempt.
    pub async fn try_generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_retry(prompt, None).await
    }

    /// Asks for a short, jargon-free explanation of a portfolio project.
    pub async fn explain_project(&self, project: &ProjectBrief) -> String {
        self.generate(&explanation_prompt(project)).await
    }

    /// Like [`GeminiClient::try_generate`], but stops as soon as `cancel`
    /// fires, whether a request or a backoff sleep is in flight.
    ///
    /// Returns [`GeminiError::Cancelled`] in that case.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn try_generate_cancellable(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.generate_with_retry(prompt, Some(cancel)).await
    }

    /// Like [`GeminiClient::generate`], but returns `None` when cancelled
    /// instead of the fallback message.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn generate_cancellable(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Option<String> {
        match self.try_generate_cancellable(prompt, cancel).await {
            Err(GeminiError::Cancelled) => None,
            other => Some(into_text_or_fallback(other)),
        }
    }

    async fn generate_with_retry(
        &self,
        prompt: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<String> {
        let request = GenerateRequest::from_prompt(prompt);
        let mut attempt = 0usize;
        loop {
            let err = match until_cancelled(self.send_once(&request), cancel).await? {
                Ok(text) => {
                    #[cfg(feature = "tracing")]
                    {
                        if attempt > 0 {
                            tracing::debug!(attempt, "generateContent succeeded after retry");
                        }
                    }
                    return Ok(text);
                }
                Err(err) => err,
            };

            #[cfg(feature = "tracing")]
            tracing::warn!(
                attempt,
                error_kind = err.kind(),
                error = %err,
                "generateContent attempt failed"
            );

            if attempt >= self.options.max_retries {
                return Err(GeminiError::RetryExhausted {
                    attempts: attempt + 1,
                    last_error: Box::new(err),
                });
            }

            self.wait_before_retry(attempt, cancel).await?;
            attempt += 1;
        }
    }

    async fn send_once(&self, request: &GenerateRequest<'_>) -> Result<String> {
        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms));
        if !self.api_key.is_empty() {
            builder = builder.query(&[("key", self.api_key.as_str())]);
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(GeminiError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GeminiError::Transport)?;

        if !status.is_success() {
            return Err(GeminiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        decode_generated_text(&body)
    }

    /// Waits before the next retry attempt, unless cancelled first.
    async fn wait_before_retry(&self, attempt: usize, cancel: Option<&CancelSignal>) -> Result<()> {
        let delay = backoff::next_delay(&self.options, attempt);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            "retrying generateContent request"
        );

        until_cancelled(sleep(delay), cancel).await
    }
}

fn into_text_or_fallback(result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "returning fallback message");
            FALLBACK_MESSAGE.to_owned()
        }
    }
}

/// Drives `fut` to completion unless `cancel` fires first.
#[cfg(not(target_arch = "wasm32"))]
async fn until_cancelled<F: Future>(fut: F, cancel: Option<&CancelSignal>) -> Result<F::Output> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(GeminiError::Cancelled),
            output = fut => Ok(output),
        },
        None => Ok(fut.await),
    }
}

#[cfg(target_arch = "wasm32")]
async fn until_cancelled<F: Future>(fut: F, _cancel: Option<&CancelSignal>) -> Result<F::Output> {
    Ok(fut.await)
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Suspends via the host's `setTimeout`; resolves immediately if the host
/// has none.
#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    use wasm_bindgen::{JsCast, JsValue};

    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let set_timeout = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("setTimeout"))
            .and_then(|value| value.dyn_into::<js_sys::Function>());
        match set_timeout {
            Ok(set_timeout) => {
                let _ = set_timeout.call2(&JsValue::NULL, &resolve, &JsValue::from(ms));
            }
            Err(_) => {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
