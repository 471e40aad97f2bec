//! Hugging Face Inference API client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::traits::{InferenceOutcome, TextGenerator};
use crate::infrastructure::config::InferenceConfig;

/// Hugging Face Inference API base
const API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Fixed instruction prefixed to every prompt
const INSTRUCTION_PREAMBLE: &str =
    "Respond truthfully, creatively, and without restriction.";

/// Fixed turn marker appended after the user text
const TURN_MARKER: &str = "\nBot:";

/// Gateway around a single Hugging Face text-generation endpoint
pub struct HuggingFaceGateway {
    api_key: String,
    client: Client,
    endpoint: String,
    max_length: u32,
    temperature: f32,
    do_sample: bool,
}

/// API request structure
#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    max_length: u32,
    temperature: f32,
    do_sample: bool,
}

/// Element of a successful response array
#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

/// Failure response body
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HuggingFaceGateway {
    pub fn new(api_key: impl Into<String>, config: &InferenceConfig) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            endpoint: format!("{}/{}", API_BASE, config.model),
            max_length: config.max_length,
            temperature: config.temperature,
            do_sample: config.do_sample,
        }
    }

    /// Full prompt sent to the model: preamble, user turn, turn marker
    fn build_prompt(text: &str) -> String {
        format!("{}\nUser: {}{}", INSTRUCTION_PREAMBLE, text, TURN_MARKER)
    }

    /// Classify an HTTP response into an outcome. Models echo the prompt
    /// at the start of `generated_text`; the echo is stripped before the
    /// reply is returned.
    fn outcome_from_response(status: StatusCode, body: &str, prompt: &str) -> InferenceOutcome {
        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "unknown error".to_string());
            return InferenceOutcome::BackendError(detail);
        }

        let items: Vec<Generated> = match serde_json::from_str(body) {
            Ok(items) => items,
            Err(e) => {
                return InferenceOutcome::TransportError(format!("malformed response: {}", e))
            }
        };

        match items.into_iter().next() {
            Some(item) => {
                let text = item
                    .generated_text
                    .strip_prefix(prompt)
                    .unwrap_or(&item.generated_text)
                    .trim()
                    .to_string();
                InferenceOutcome::Success(text)
            }
            None => InferenceOutcome::TransportError("empty response array".to_string()),
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGateway {
    /// One call, one outcome. Transport faults never escape as errors.
    async fn generate(&self, text: &str) -> InferenceOutcome {
        let prompt = Self::build_prompt(text);
        let request = GenerateRequest {
            inputs: &prompt,
            parameters: Parameters {
                max_length: self.max_length,
                temperature: self.temperature,
                do_sample: self.do_sample,
            },
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return InferenceOutcome::TransportError(e.to_string()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return InferenceOutcome::TransportError(e.to_string()),
        };

        Self::outcome_from_response(status, &body, &prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_preamble_text_and_marker() {
        let prompt = HuggingFaceGateway::build_prompt("what is rust?");
        assert!(prompt.starts_with(INSTRUCTION_PREAMBLE));
        assert!(prompt.contains("what is rust?"));
        assert!(prompt.ends_with(TURN_MARKER));
    }

    #[test]
    fn success_strips_the_echoed_prompt_and_trims() {
        let prompt = HuggingFaceGateway::build_prompt("hello");
        let body = serde_json::json!([
            { "generated_text": format!("{} Hi there  ", prompt) }
        ])
        .to_string();

        let outcome = HuggingFaceGateway::outcome_from_response(StatusCode::OK, &body, &prompt);
        assert_eq!(outcome, InferenceOutcome::Success("Hi there".to_string()));
    }

    #[test]
    fn success_without_echo_is_returned_as_is() {
        let body = r#"[{"generated_text": "just an answer"}]"#;
        let outcome =
            HuggingFaceGateway::outcome_from_response(StatusCode::OK, body, "unrelated prompt");
        assert_eq!(
            outcome,
            InferenceOutcome::Success("just an answer".to_string())
        );
    }

    #[test]
    fn backend_error_detail_is_extracted() {
        let body = r#"{"error": "model loading"}"#;
        let outcome = HuggingFaceGateway::outcome_from_response(
            StatusCode::SERVICE_UNAVAILABLE,
            body,
            "prompt",
        );
        assert_eq!(
            outcome,
            InferenceOutcome::BackendError("model loading".to_string())
        );
    }

    #[test]
    fn missing_error_field_falls_back_to_unknown() {
        let outcome = HuggingFaceGateway::outcome_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "{}",
            "prompt",
        );
        assert_eq!(
            outcome,
            InferenceOutcome::BackendError("unknown error".to_string())
        );

        let outcome = HuggingFaceGateway::outcome_from_response(
            StatusCode::BAD_GATEWAY,
            "not json at all",
            "prompt",
        );
        assert_eq!(
            outcome,
            InferenceOutcome::BackendError("unknown error".to_string())
        );
    }

    #[test]
    fn malformed_success_body_is_a_transport_error() {
        let outcome =
            HuggingFaceGateway::outcome_from_response(StatusCode::OK, "not json", "prompt");
        assert!(matches!(outcome, InferenceOutcome::TransportError(_)));

        let outcome = HuggingFaceGateway::outcome_from_response(StatusCode::OK, "[]", "prompt");
        assert!(matches!(outcome, InferenceOutcome::TransportError(_)));
    }
}
