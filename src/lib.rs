pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GeminiExplainer, LocalStorage, NoopExplainer};
pub use config::AppConfig;
pub use crate::core::{engine::CalculatorEngine, erlang::ErlangTable};
pub use domain::model::{CalculationInput, CalculationResponse, CalculationResult, Scenario};
pub use utils::error::{CalcError, Result};
