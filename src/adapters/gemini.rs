use crate::core::{CalculationResult, ConfigProvider, ExplanationGenerator, Scenario};
use crate::utils::error::{CalcError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini API 金鑰標頭
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Explanation generator backed by the Gemini `generateContent` endpoint.
pub struct GeminiExplainer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiExplainer {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        // 外部呼叫一律設定逾時
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            endpoint: config.explanation_endpoint().trim_end_matches('/').to_string(),
            model: config.explanation_model().to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

pub fn build_prompt(scenario: Scenario, inputs: &Value, results: &CalculationResult) -> Result<String> {
    let inputs = serde_json::to_string_pretty(inputs)?;
    let results = serde_json::to_string_pretty(&Value::Object(results.display_map()))?;

    Ok(format!(
        "Provide a detailed, user-friendly explanation for the following wireless network calculation scenario: {}.\n\n\
         User Inputs: {}\n\
         Calculated Results: {}\n\n\
         Explain the methodology, the significance of the results, and how they relate to the input parameters. \
         Keep the explanation concise and easy to understand for someone with a basic understanding of wireless communications.",
        scenario.title(),
        inputs,
        results
    ))
}

#[async_trait]
impl ExplanationGenerator for GeminiExplainer {
    fn provider(&self) -> &str {
        "Gemini"
    }

    async fn try_generate(
        &self,
        scenario: Scenario,
        inputs: &Value,
        results: &CalculationResult,
    ) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CalcError::ExternalServiceError {
                message: "no API key configured".to_string(),
            })?;

        let prompt = build_prompt(scenario, inputs, results)?;
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!("Requesting {} explanation from: {}", scenario, self.url());
        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        tracing::debug!("Explanation response status: {}", status);
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CalcError::ExternalServiceError {
                message: format!("HTTP {}: {}", status, detail.trim()),
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(reqwest::Error::without_url)?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CalcError::ExternalServiceError {
                message: "response contained no text".to_string(),
            });
        }
        Ok(text)
    }
}

/// Used when explanations are switched off.
pub struct NoopExplainer;

#[async_trait]
impl ExplanationGenerator for NoopExplainer {
    fn provider(&self) -> &str {
        "none"
    }

    async fn try_generate(
        &self,
        _scenario: Scenario,
        _inputs: &Value,
        _results: &CalculationResult,
    ) -> Result<String> {
        Ok("AI explanation is disabled for this calculator.".to_string())
    }
}
