//! Gemini client: the single place that talks to the generative model.
//!
//! One `generateContent` call per extraction, carrying the documents as inline
//! base64 parts, the instruction text and a response schema. The response text
//! is validated against the report shape before it is trusted.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::extraction::prompts::{build_extraction_prompt, questionnaire_mismatches};
use crate::extraction::schema::{report_schema, REQUIRED_FIELDS};
use crate::extraction::upload::DocumentUpload;
use crate::extraction::{ExtractionError, ReportExtractor};
use crate::models::Report;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for every extraction.
pub const MODEL: &str = "gemini-3-pro-preview";
const THINKING_BUDGET: u32 = 4000;
const REQUEST_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline(InlinePart),
    Text(TextPart<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlinePart {
    inline_data: InlineData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Set on thought-summary parts, which are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub thoughts_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// The answer text of the first candidate, or `None` when it is blank.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    /// A missing key is not an error here; extraction reports it when called.
    pub fn new(api_key: Option<String>) -> Result<Self, ExtractionError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ReportExtractor for GeminiClient {
    async fn extract(
        &self,
        resume: &DocumentUpload,
        job_description: Option<&DocumentUpload>,
    ) -> Result<Report, ExtractionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ExtractionError::MissingCredential)?;

        let prompt = build_extraction_prompt(job_description.is_some());
        let request = build_request(resume, job_description, &prompt);

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent"))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_failure(status.as_u16(), &body);
            warn!("Extraction request failed with {status}: {error}");
            return Err(error);
        }

        let raw: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::BadFormat(e.to_string()))?;

        if let Some(usage) = &raw.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                thinking_tokens = usage.thoughts_token_count,
                "Extraction call succeeded"
            );
        }

        let text = match raw.text() {
            Some(text) => text,
            None => {
                let finish_reason = raw
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .unwrap_or("none");
                warn!(finish_reason, "Extraction response had no text");
                return Err(ExtractionError::EmptyResponse);
            }
        };

        let report = parse_report(&text)?;

        let mismatches = questionnaire_mismatches(&report.functional_evaluation);
        if !mismatches.is_empty() {
            warn!(
                count = mismatches.len(),
                "Evaluation does not match the questionnaire: {}",
                mismatches.join("; ")
            );
        }

        info!(
            experience = report.professional_experience.len(),
            education = report.education.len(),
            categories = report.functional_evaluation.len(),
            with_job_description = job_description.is_some(),
            "Extracted report"
        );
        Ok(report)
    }
}

fn build_request<'a>(
    resume: &DocumentUpload,
    job_description: Option<&DocumentUpload>,
    prompt: &'a str,
) -> GenerateContentRequest<'a> {
    let mut parts: Vec<Part<'a>> = std::iter::once(resume)
        .chain(job_description)
        .map(|doc| {
            Part::Inline(InlinePart {
                inline_data: InlineData {
                    mime_type: doc.mime_type,
                    data: STANDARD.encode(&doc.data),
                },
            })
        })
        .collect();
    parts.push(Part::Text(TextPart { text: prompt }));

    GenerateContentRequest {
        contents: vec![RequestContent { parts }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: report_schema(),
            thinking_config: ThinkingConfig {
                thinking_budget: THINKING_BUDGET,
            },
        },
    }
}

/// Maps a non-success upstream response to an error the user can act on.
fn classify_failure(status: u16, body: &str) -> ExtractionError {
    let (message, api_status) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.to_string(), String::new()),
    };

    if status == 429 || api_status == "RESOURCE_EXHAUSTED" {
        return ExtractionError::RateLimited(message);
    }
    if status == 413 || message.to_ascii_lowercase().contains("payload size") {
        return ExtractionError::PayloadTooLarge(message);
    }
    ExtractionError::Api { status, message }
}

/// Validates response text as a report. Fenced JSON is accepted.
pub fn parse_report(text: &str) -> Result<Report, ExtractionError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| ExtractionError::BadFormat(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ExtractionError::BadFormat("expected a JSON object".to_string()))?;

    for field in REQUIRED_FIELDS {
        let present = match object.get(field) {
            Some(Value::String(_)) => field == "candidateName",
            Some(Value::Array(_)) => field != "candidateName",
            _ => false,
        };
        if !present {
            return Err(ExtractionError::BadFormat(format!(
                "missing or mistyped required field '{field}'"
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| ExtractionError::BadFormat(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::upload::{MS_WORD, PDF};
    use bytes::Bytes;
    use serde_json::json;

    fn doc(name: &str, mime: &'static str) -> DocumentUpload {
        DocumentUpload {
            file_name: name.to_string(),
            mime_type: mime,
            data: Bytes::from_static(b"hello"),
        }
    }

    fn valid_report_json() -> Value {
        json!({
            "candidateName": "Jane Doe",
            "employer": "Acme",
            "professionalExperience": [
                {"company": "Acme", "position": "Director", "duration": "2019 - Present", "details": ["Led 40 people"]}
            ],
            "functionalEvaluation": [
                {"category": "KPI", "questions": [{"question": "Q", "answer": "A"}]}
            ]
        })
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_request_body_shape() {
        let prompt = build_extraction_prompt(true);
        let request = build_request(&doc("cv.pdf", PDF), Some(&doc("jd.doc", MS_WORD)), &prompt);
        let body = serde_json::to_value(&request).unwrap();

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], PDF);
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["inlineData"]["mimeType"], MS_WORD);
        assert_eq!(parts[2]["text"], prompt.as_str());

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["thinkingConfig"]["thinkingBudget"], 4000);
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_request_without_job_description() {
        let prompt = build_extraction_prompt(false);
        let request = build_request(&doc("cv.pdf", PDF), None, &prompt);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_valid_report() {
        let report = parse_report(&valid_report_json().to_string()).unwrap();
        assert_eq!(report.candidate_name, "Jane Doe");
        assert_eq!(report.professional_experience.len(), 1);
        assert!(report.education.is_empty());
        assert_eq!(report.summary, "");
    }

    #[test]
    fn test_parse_fenced_report() {
        let text = format!("```json\n{}\n```", valid_report_json());
        assert!(parse_report(&text).is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        assert!(matches!(
            parse_report("not json"),
            Err(ExtractionError::BadFormat(_))
        ));
        assert!(matches!(
            parse_report("[1, 2]"),
            Err(ExtractionError::BadFormat(_))
        ));

        let mut missing = valid_report_json();
        missing.as_object_mut().unwrap().remove("functionalEvaluation");
        assert!(matches!(
            parse_report(&missing.to_string()),
            Err(ExtractionError::BadFormat(m)) if m.contains("functionalEvaluation")
        ));

        let mut mistyped = valid_report_json();
        mistyped["professionalExperience"] = json!("none");
        assert!(matches!(
            parse_report(&mistyped.to_string()),
            Err(ExtractionError::BadFormat(_))
        ));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(matches!(parse_report("  "), Err(ExtractionError::EmptyResponse)));
        assert!(matches!(parse_report("```json\n```"), Err(ExtractionError::EmptyResponse)));
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let raw: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"a\":"},
                    {"text": "1}"}
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(raw.text().as_deref(), Some("{\"a\":1}"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.text().is_none());
    }

    #[test]
    fn test_classify_failures() {
        let body = json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}});
        assert!(matches!(
            classify_failure(429, &body.to_string()),
            ExtractionError::RateLimited(m) if m == "Quota exceeded"
        ));

        let body = json!({"error": {"code": 400, "message": "Request payload size exceeds the limit", "status": "INVALID_ARGUMENT"}});
        assert!(matches!(
            classify_failure(400, &body.to_string()),
            ExtractionError::PayloadTooLarge(_)
        ));
        assert!(matches!(
            classify_failure(413, "too big"),
            ExtractionError::PayloadTooLarge(_)
        ));

        assert!(matches!(
            classify_failure(500, "boom"),
            ExtractionError::Api { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_network() {
        let client = GeminiClient::new(Some("   ".to_string())).unwrap();
        assert!(!client.has_credential());
        let err = client.extract(&doc("cv.pdf", PDF), None).await.unwrap_err();
        assert!(matches!(err, ExtractionError::MissingCredential));
    }
}
