use crate::core::erlang::ErlangTable;
use crate::core::{cellular, link_budget, ofdm, transmission};
use crate::domain::model::{
    CalculationInput, CalculationResponse, CalculationResult, HealthReport, Scenario,
};
use crate::domain::ports::ExplanationGenerator;
use crate::utils::error::Result;
use serde_json::Value;

/// Dispatches requests to the calculators and attaches an explanation to each result.
pub struct CalculatorEngine<E: ExplanationGenerator> {
    table: ErlangTable,
    explainer: E,
}

impl<E: ExplanationGenerator> CalculatorEngine<E> {
    pub fn new(table: ErlangTable, explainer: E) -> Self {
        Self { table, explainer }
    }

    pub fn table(&self) -> &ErlangTable {
        &self.table
    }

    pub fn calculate(&self, scenario: Scenario, input: &CalculationInput) -> Result<CalculationResult> {
        let result = match scenario {
            Scenario::TransmissionChain => {
                let params = transmission::TransmissionChainParams::from_input(input)?;
                transmission::calculate(&params)?.to_result()
            }
            Scenario::Ofdm => {
                let params = ofdm::OfdmParams::from_input(input)?;
                ofdm::calculate(&params)?.to_result()
            }
            Scenario::LinkBudget => {
                let params = link_budget::LinkBudgetParams::from_input(input)?;
                link_budget::calculate(&params)?.to_result()
            }
            Scenario::Cellular => {
                let params = cellular::CellularParams::from_input(input)?;
                cellular::calculate(&params, &self.table)?.to_result()
            }
        };
        Ok(result)
    }

    /// Numeric failures become a failure envelope; explanation failures never do.
    pub async fn handle(&self, scenario: Scenario, body: &Value) -> CalculationResponse {
        tracing::info!("🧮 Calculating {}", scenario);
        tracing::debug!("Request body for {}: {}", scenario, body);

        let result = match CalculationInput::from_json(body)
            .and_then(|input| self.calculate(scenario, &input))
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("❌ {} calculation failed: {}", scenario, e);
                return CalculationResponse::failure(&e);
            }
        };

        let explanation = self.explainer.generate(scenario, body, &result).await;
        tracing::info!("✅ {} calculation completed", scenario);
        CalculationResponse::success(&result, explanation)
    }

    pub async fn handle_route(&self, route: &str, body: &Value) -> CalculationResponse {
        match route.parse::<Scenario>() {
            Ok(scenario) => self.handle(scenario, body).await,
            Err(e) => {
                tracing::error!("❌ {}", e);
                CalculationResponse::failure(&e)
            }
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy".to_string(),
            message: "Wireless Network Calculator API is running!".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
