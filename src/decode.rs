use crate::{wire, GeminiError};

/// Parses a raw response body and pulls out the generated text.
pub(crate) fn decode_generated_text(body: &str) -> Result<String, GeminiError> {
    let response = serde_json::from_str::<wire::GenerateResponse>(body).map_err(|err| {
        GeminiError::MalformedResponse(format!("invalid response JSON: {err}; body: {body}"))
    })?;
    extract_text(response)
}

/// Returns `candidates[0].content.parts[0].text`.
///
/// An empty string counts as missing.
pub(crate) fn extract_text(response: wire::GenerateResponse) -> Result<String, GeminiError> {
    let candidate = response
        .candidates
        .ok_or_else(|| GeminiError::MalformedResponse("missing candidates".to_owned()))?
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::MalformedResponse("empty candidates".to_owned()))?;

    let part = candidate
        .content
        .ok_or_else(|| GeminiError::MalformedResponse("missing candidate content".to_owned()))?
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::MalformedResponse("missing content parts".to_owned()))?;

    match part.text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(GeminiError::MalformedResponse(
            "missing text in first part".to_owned(),
        )),
    }
}
