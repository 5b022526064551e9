//! Bit rates along a digital transmission chain: sampler, quantizer, source
//! encoder, channel encoder, interleaver and burst formatter.

use crate::domain::model::{CalculationInput, CalculationResult, ResultValue};
use crate::utils::error::{CalcError, Result};
use crate::utils::format;

#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionChainParams {
    /// Hz
    pub bandwidth: f64,
    pub quantization_bits: i64,
    /// Source encoder compression ratio.
    pub source_encoder_bits: f64,
    /// Channel code rate.
    pub channel_encoder: f64,
    pub interleaver_bits: i64,
    pub block_size: i64,
    pub overhead_per_block: i64,
}

impl TransmissionChainParams {
    pub fn from_input(input: &CalculationInput) -> Result<Self> {
        Ok(Self {
            bandwidth: input.number("bandwidth")?,
            quantization_bits: input.integer("quantization_bits")?,
            source_encoder_bits: input.number("source_encoder_bits")?,
            channel_encoder: input.number("channel_encoder")?,
            interleaver_bits: input.integer("interleaver_bits")?,
            block_size: input.integer("block_size")?,
            overhead_per_block: input.integer("overhead_per_block")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionChainReport {
    pub sampler_output: f64,
    pub quantizer_output: f64,
    pub source_encoder_output: f64,
    pub channel_encoder_output: f64,
    pub interleaver_output: f64,
    pub number_of_blocks: f64,
    pub total_overhead_bits: f64,
    pub burst_formatting: f64,
}

pub fn calculate(params: &TransmissionChainParams) -> Result<TransmissionChainReport> {
    if params.channel_encoder == 0.0 {
        return Err(CalcError::invalid_input("channel_encoder", "code rate cannot be zero"));
    }
    if params.block_size == 0 {
        return Err(CalcError::invalid_input("block_size", "block size cannot be zero"));
    }

    // Nyquist 取樣
    let sampler_output = params.bandwidth * 2.0;
    let quantizer_output = sampler_output * params.quantization_bits as f64;
    let source_encoder_output = quantizer_output * params.source_encoder_bits;
    let channel_encoder_output = source_encoder_output * (1.0 / params.channel_encoder);
    // 交錯器不改變速率
    let interleaver_output = channel_encoder_output;

    let number_of_blocks = params.interleaver_bits as f64 / params.block_size as f64;
    let total_overhead_bits = number_of_blocks * params.overhead_per_block as f64;
    let burst_formatting = params.interleaver_bits as f64 + total_overhead_bits;

    Ok(TransmissionChainReport {
        sampler_output,
        quantizer_output,
        source_encoder_output,
        channel_encoder_output,
        interleaver_output,
        number_of_blocks,
        total_overhead_bits,
        burst_formatting,
    })
}

impl TransmissionChainReport {
    pub fn to_result(&self) -> CalculationResult {
        let mut result = CalculationResult::new();
        let rows = [
            ("sampler_output", self.sampler_output, "samples/sec"),
            ("quantizer_output", self.quantizer_output, "bps"),
            ("source_encoder_output", self.source_encoder_output, "bps"),
            ("channel_encoder_output", self.channel_encoder_output, "bps"),
            ("interleaver_output", self.interleaver_output, "bps"),
            ("burst_formatting", self.burst_formatting, "bps"),
        ];
        for (name, value, unit) in rows {
            result.push(
                name,
                ResultValue::Number(value),
                format!("{} {}", format::grouped(value, 0), unit),
            );
        }
        result
    }
}
