//! OFDM resource-block throughput.

use crate::domain::model::{CalculationInput, CalculationResult, ResultValue};
use crate::utils::error::{CalcError, Result};
use crate::utils::format;

#[derive(Debug, Clone, PartialEq)]
pub struct OfdmParams {
    /// kHz
    pub bw_resource_block: f64,
    /// kHz
    pub subcarrier_spacing: f64,
    pub ofdm_symbols: i64,
    /// ms
    pub rb_duration: f64,
    /// Modulation order M (e.g. 64 for 64-QAM).
    pub modulated_bits: i64,
    pub parallel_rb: i64,
}

impl OfdmParams {
    pub fn from_input(input: &CalculationInput) -> Result<Self> {
        Ok(Self {
            bw_resource_block: input.number("bw_resource_block")?,
            subcarrier_spacing: input.number("subcarrier_spacing")?,
            ofdm_symbols: input.integer("ofdm_symbols")?,
            rb_duration: input.number("rb_duration")?,
            modulated_bits: input.integer("modulated_bits")?,
            parallel_rb: input.integer("parallel_rb")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfdmReport {
    pub data_rate_resource_element: f64,
    pub bits_per_ofdm_symbol: f64,
    pub bits_per_resource_block: f64,
    pub max_transmission: f64,
    pub spectral_efficiency: f64,
}

pub fn calculate(params: &OfdmParams) -> Result<OfdmReport> {
    if params.modulated_bits <= 0 {
        return Err(CalcError::invalid_input(
            "modulated_bits",
            "modulation order must be positive",
        ));
    }
    if params.subcarrier_spacing == 0.0 {
        return Err(CalcError::invalid_input(
            "subcarrier_spacing",
            "subcarrier spacing cannot be zero",
        ));
    }
    if params.rb_duration == 0.0 {
        return Err(CalcError::invalid_input("rb_duration", "resource block duration cannot be zero"));
    }
    if params.bw_resource_block == 0.0 {
        return Err(CalcError::invalid_input(
            "bw_resource_block",
            "resource block bandwidth cannot be zero",
        ));
    }

    let data_rate_resource_element = (params.modulated_bits as f64).log2();
    let subcarriers = params.bw_resource_block / params.subcarrier_spacing;
    let bits_per_ofdm_symbol = subcarriers * data_rate_resource_element;
    let bits_per_resource_block = bits_per_ofdm_symbol * params.ofdm_symbols as f64;
    // rb_duration 以 ms 計
    let max_transmission =
        (params.parallel_rb as f64 * bits_per_resource_block) / (params.rb_duration / 1000.0);
    let spectral_efficiency = max_transmission / (params.bw_resource_block * 1000.0);

    Ok(OfdmReport {
        data_rate_resource_element,
        bits_per_ofdm_symbol,
        bits_per_resource_block,
        max_transmission,
        spectral_efficiency,
    })
}

impl OfdmReport {
    pub fn to_result(&self) -> CalculationResult {
        let mut result = CalculationResult::new();
        let rows = [
            ("data_rate_resource_element", self.data_rate_resource_element, "bits/s"),
            ("bits_per_ofdm_symbol", self.bits_per_ofdm_symbol, "bits"),
            ("bits_per_resource_block", self.bits_per_resource_block, "bits"),
            ("max_transmission", self.max_transmission, "bps"),
            ("spectral_efficiency", self.spectral_efficiency, "bits/s/Hz"),
        ];
        for (name, value, unit) in rows {
            result.push(
                name,
                ResultValue::Number(value),
                format!("{} {}", format::fixed(value, 2), unit),
            );
        }
        result
    }
}
