use crate::domain::model::{CalculationResult, Scenario};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn erlang_table_path(&self) -> &str;
    fn explanation_enabled(&self) -> bool;
    fn explanation_endpoint(&self) -> &str;
    fn explanation_model(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
}

/// External text generator describing a finished calculation.
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    /// Short provider name used in fallback messages.
    fn provider(&self) -> &str;

    async fn try_generate(
        &self,
        scenario: Scenario,
        inputs: &Value,
        results: &CalculationResult,
    ) -> Result<String>;

    /// Never fails: errors are folded into a descriptive fallback string.
    async fn generate(
        &self,
        scenario: Scenario,
        inputs: &Value,
        results: &CalculationResult,
    ) -> String {
        match self.try_generate(scenario, inputs, results).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("⚠️ {} explanation failed for {}: {}", self.provider(), scenario, e);
                format!(
                    "Failed to generate AI explanation using {}. Error: {}. Please check your API key and network connection.",
                    self.provider(),
                    e
                )
            }
        }
    }
}

#[async_trait]
impl ExplanationGenerator for Box<dyn ExplanationGenerator> {
    fn provider(&self) -> &str {
        (**self).provider()
    }

    async fn try_generate(
        &self,
        scenario: Scenario,
        inputs: &Value,
        results: &CalculationResult,
    ) -> Result<String> {
        (**self).try_generate(scenario, inputs, results).await
    }

    async fn generate(
        &self,
        scenario: Scenario,
        inputs: &Value,
        results: &CalculationResult,
    ) -> String {
        (**self).generate(scenario, inputs, results).await
    }
}
