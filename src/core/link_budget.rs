//! Bidirectional access-point / client link budget.

use crate::domain::model::{CalculationInput, CalculationResult, ResultValue};
use crate::utils::error::{CalcError, Result};
use crate::utils::format;

/// `20·log10(4π/c)` for distance in metres and frequency in Hz.
pub const FSPL_CONSTANT_DB: f64 = -147.56;

#[derive(Debug, Clone, PartialEq)]
pub struct LinkBudgetParams {
    /// dBm
    pub ap_tx_power: f64,
    /// dBi
    pub ap_antenna_gain: f64,
    /// dBm
    pub ap_rx_sensitivity: f64,
    /// dBm
    pub client_tx_power: f64,
    /// dBi
    pub client_antenna_gain: f64,
    /// dBm
    pub client_rx_sensitivity: f64,
    /// dB
    pub cable_loss_each_side: f64,
    /// km
    pub distance_km: f64,
    /// GHz
    pub frequency_ghz: f64,
}

impl LinkBudgetParams {
    pub fn from_input(input: &CalculationInput) -> Result<Self> {
        Ok(Self {
            ap_tx_power: input.number("access_point_transmit_power")?,
            ap_antenna_gain: input.number("access_point_antenna_gain")?,
            ap_rx_sensitivity: input.number("access_point_receive_sensitivity")?,
            client_tx_power: input.number("client_transmit_power")?,
            client_antenna_gain: input.number("client_antenna_gain")?,
            client_rx_sensitivity: input.number("client_receive_sensitivity")?,
            cable_loss_each_side: input.number("cable_loss_each_side")?,
            distance_km: input.number("distance")?,
            frequency_ghz: input.number("frequency")?,
        })
    }
}

/// One direction of the link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLink {
    pub tx_power: f64,
    pub eirp: f64,
    pub rx_power: f64,
    pub margin: f64,
}

impl DirectionalLink {
    pub fn is_reliable(&self) -> bool {
        self.margin >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkBudgetReport {
    pub free_space_loss: f64,
    pub ap_to_client: DirectionalLink,
    pub client_to_ap: DirectionalLink,
}

impl LinkBudgetReport {
    pub fn link_reliable(&self) -> bool {
        self.ap_to_client.is_reliable() && self.client_to_ap.is_reliable()
    }
}

pub fn free_space_path_loss(distance_m: f64, frequency_hz: f64) -> Result<f64> {
    if distance_m.is_nan() || distance_m <= 0.0 {
        return Err(CalcError::invalid_input("distance", "distance must be greater than zero"));
    }
    if frequency_hz.is_nan() || frequency_hz <= 0.0 {
        return Err(CalcError::invalid_input("frequency", "frequency must be greater than zero"));
    }
    Ok(20.0 * distance_m.log10() + 20.0 * frequency_hz.log10() + FSPL_CONSTANT_DB)
}

/// Received power and margin for a transmitter whose EIRP already includes its own cable loss.
pub fn directional_link(
    tx_power: f64,
    eirp: f64,
    fspl: f64,
    cable_loss: f64,
    rx_antenna_gain: f64,
    rx_sensitivity: f64,
) -> DirectionalLink {
    let rx_power = eirp - fspl - cable_loss + rx_antenna_gain;
    DirectionalLink {
        tx_power,
        eirp,
        rx_power,
        margin: rx_power - rx_sensitivity,
    }
}

pub fn calculate(params: &LinkBudgetParams) -> Result<LinkBudgetReport> {
    let free_space_loss =
        free_space_path_loss(params.distance_km * 1000.0, params.frequency_ghz * 1e9)?;
    let cable_loss = params.cable_loss_each_side;

    let ap_eirp = params.ap_tx_power + params.ap_antenna_gain - cable_loss;
    let ap_to_client = directional_link(
        params.ap_tx_power,
        ap_eirp,
        free_space_loss,
        cable_loss,
        params.client_antenna_gain,
        params.client_rx_sensitivity,
    );

    let client_eirp = params.client_tx_power + params.client_antenna_gain - cable_loss;
    let client_to_ap = directional_link(
        params.client_tx_power,
        client_eirp,
        free_space_loss,
        cable_loss,
        params.ap_antenna_gain,
        params.ap_rx_sensitivity,
    );

    Ok(LinkBudgetReport {
        free_space_loss,
        ap_to_client,
        client_to_ap,
    })
}

impl LinkBudgetReport {
    pub fn to_result(&self) -> CalculationResult {
        let mut result = CalculationResult::new();
        let rows = [
            ("transmitted_power_ap", self.ap_to_client.tx_power, "dBm"),
            ("received_signal_strength_client", self.ap_to_client.rx_power, "dBm"),
            ("transmitted_power_client", self.client_to_ap.tx_power, "dBm"),
            ("received_signal_strength_ap", self.client_to_ap.rx_power, "dBm"),
            ("free_space_loss", self.free_space_loss, "dB"),
            ("link_margin_ap_to_client", self.ap_to_client.margin, "dB"),
            ("link_margin_client_to_ap", self.client_to_ap.margin, "dB"),
        ];
        for (name, value, unit) in rows {
            result.push(
                name,
                ResultValue::Number(value),
                format!("{} {}", format::fixed(value, 2), unit),
            );
        }

        let reliable = self.link_reliable();
        result.push(
            "status",
            ResultValue::Flag(reliable),
            if reliable { "Yes" } else { "No" }.to_string(),
        );
        result
    }
}
