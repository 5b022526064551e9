pub mod cellular;
pub mod cluster;
pub mod engine;
pub mod erlang;
pub mod link_budget;
pub mod ofdm;
pub mod transmission;

pub use crate::domain::model::{CalculationInput, CalculationResponse, CalculationResult, Scenario};
pub use crate::domain::ports::{ConfigProvider, ExplanationGenerator, Storage};
pub use crate::utils::error::Result;
