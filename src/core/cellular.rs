//! Cellular capacity and traffic-engineering calculator.

use crate::core::cluster::{self, ClusterSelection};
use crate::core::erlang::{ChannelLookup, ErlangTable};
use crate::domain::model::{CalculationInput, CalculationResult, ResultValue};
use crate::utils::error::{CalcError, Result};
use crate::utils::format;

const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

/// `3·√3/2`, area of a unit-radius hexagon.
const HEXAGON_AREA_FACTOR: f64 = 2.598_076_211_353_316;

#[derive(Debug, Clone, PartialEq)]
pub struct CellularParams {
    pub time_slots_per_carrier: i64,
    /// m²
    pub total_area: f64,
    pub max_number_of_users: i64,
    pub number_of_calls_per_day: i64,
    /// minutes
    pub call_duration: f64,
    pub gos: f64,
    /// dB
    pub sir: f64,
    /// dB
    pub p0: f64,
    pub receiver_sensitivity: f64,
    /// m
    pub d0: f64,
    pub path_loss_exponent: f64,
    pub co_channel_interferers: i64,
}

impl CellularParams {
    pub fn from_input(input: &CalculationInput) -> Result<Self> {
        Ok(Self {
            time_slots_per_carrier: input.integer("time_slots_per_carrier")?,
            total_area: input.number("total_area")?,
            max_number_of_users: input.integer("max_number_of_users")?,
            number_of_calls_per_day: input.integer("number_of_calls_per_day")?,
            call_duration: input.number("call_duration")?,
            gos: input.number("gos")?,
            sir: input.number("sir")?,
            p0: input.number("p0")?,
            receiver_sensitivity: input.number("receiver_sensitivity")?,
            d0: input.number("d0")?,
            path_loss_exponent: input.number("path_loss_exponent")?,
            co_channel_interferers: input.integer("co_channel_interferers")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellularReport {
    pub max_distance: f64,
    pub max_cell_size: f64,
    pub number_of_cells: f64,
    pub traffic_load_per_user: f64,
    pub traffic_load_system: f64,
    pub traffic_load_cell: f64,
    pub cluster: ClusterSelection,
    pub channels: ChannelLookup,
    pub min_carriers: u64,
}

pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

pub fn calculate(params: &CellularParams, table: &ErlangTable) -> Result<CellularReport> {
    let sir_linear = db_to_linear(params.sir);
    let p0_linear = db_to_linear(params.p0);

    if params.receiver_sensitivity == 0.0 {
        return Err(CalcError::invalid_input(
            "receiver_sensitivity",
            "Receiver sensitivity cannot be zero",
        ));
    }
    if params.receiver_sensitivity < 0.0 {
        return Err(CalcError::invalid_input(
            "receiver_sensitivity",
            "Receiver sensitivity must be a positive power level",
        ));
    }
    if params.path_loss_exponent == 0.0 {
        return Err(CalcError::invalid_input(
            "path_loss_exponent",
            "Path loss exponent cannot be zero",
        ));
    }
    if params.co_channel_interferers < 0 {
        return Err(CalcError::invalid_input(
            "co_channel_interferers",
            "Number of co-channel interferers cannot be negative",
        ));
    }

    // a) 最大傳輸距離
    let max_distance =
        params.d0 * (p0_linear / params.receiver_sensitivity).powf(1.0 / params.path_loss_exponent);
    tracing::debug!("Calculated max_distance: {}", max_distance);

    // b) 六角形蜂巢最大面積
    let max_cell_size = HEXAGON_AREA_FACTOR * max_distance.powi(2);
    tracing::debug!("Calculated max_cell_size: {}", max_cell_size);

    // c) 服務區域內的蜂巢數
    let number_of_cells = if max_cell_size > 0.0 {
        params.total_area / max_cell_size
    } else {
        0.0
    };
    tracing::debug!("Calculated number_of_cells: {}", number_of_cells);

    // d) 整體系統話務量
    let traffic_load_per_user =
        params.number_of_calls_per_day as f64 * (params.call_duration * 60.0) / SECONDS_PER_DAY;
    let traffic_load_system = traffic_load_per_user * params.max_number_of_users as f64;
    tracing::debug!("Calculated traffic_load_system: {}", traffic_load_system);

    // e) 每個蜂巢的話務量
    let traffic_load_cell = if number_of_cells > 0.0 {
        traffic_load_system / number_of_cells
    } else {
        0.0
    };
    tracing::debug!("Calculated traffic_load_cell: {}", traffic_load_cell);

    // f) 叢集大小
    let required = cluster::theoretical_cluster_size(
        sir_linear,
        params.co_channel_interferers as f64,
        params.path_loss_exponent,
    );
    if required.is_nan() {
        return Err(CalcError::invalid_input(
            "co_channel_interferers",
            "cluster size requirement is not a number",
        ));
    }
    let cluster = cluster::select_cluster_size(required);
    tracing::debug!(
        "Calculated cluster requirement {} -> {} cells",
        required,
        cluster.size
    );

    // g) 所需最少載波數
    let channels = table.channels_for(params.gos, traffic_load_cell)?;
    let min_carriers = if params.time_slots_per_carrier > 0 {
        (u64::from(channels.channels) * u64::from(cluster.size))
            .div_ceil(params.time_slots_per_carrier as u64)
    } else {
        0
    };
    tracing::debug!("Calculated min_carriers: {}", min_carriers);

    Ok(CellularReport {
        max_distance,
        max_cell_size,
        number_of_cells,
        traffic_load_per_user,
        traffic_load_system,
        traffic_load_cell,
        cluster,
        channels,
        min_carriers,
    })
}

impl CellularReport {
    pub fn to_result(&self) -> CalculationResult {
        let mut result = CalculationResult::new();
        result.push(
            "max_distance",
            ResultValue::Number(self.max_distance),
            format!("{} meters", format::fixed(self.max_distance, 2)),
        );
        result.push(
            "max_cell_size",
            ResultValue::Number(self.max_cell_size),
            format!("{} m²", format::fixed(self.max_cell_size, 2)),
        );
        result.push(
            "number_of_cells",
            ResultValue::Number(self.number_of_cells),
            format!("{} cells", format::grouped(self.number_of_cells, 0)),
        );
        result.push(
            "traffic_load_system",
            ResultValue::Number(self.traffic_load_system),
            format!("{} Erlang", format::fixed(self.traffic_load_system, 2)),
        );
        result.push(
            "traffic_load_cell",
            ResultValue::Number(self.traffic_load_cell),
            format!("{} Erlang", format::fixed(self.traffic_load_cell, 2)),
        );
        result.push(
            "cluster_cells",
            ResultValue::Count(u64::from(self.cluster.size)),
            format!("{} cells", self.cluster.size),
        );
        result.push(
            "channels_needed",
            ResultValue::Count(u64::from(self.channels.channels)),
            format!("{} channels", self.channels.channels),
        );
        result.push(
            "min_carriers",
            ResultValue::Count(self.min_carriers),
            format!("{} carriers", self.min_carriers),
        );

        if self.cluster.saturated {
            result.push(
                "cluster_note",
                ResultValue::Text,
                format!(
                    "Required cluster size {:.2} exceeds the largest reuse pattern; capped at {} cells",
                    self.cluster.required, self.cluster.size
                ),
            );
        }
        if self.channels.saturated {
            result.push(
                "erlang_table_note",
                ResultValue::Text,
                format!(
                    "Traffic of {:.2} Erlang per cell is beyond the Erlang-B table at GoS {}; assumed {} channels",
                    self.traffic_load_cell, self.channels.column, self.channels.channels
                ),
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::format::parse_display;
    use serde_json::json;

    fn bundled_table() -> ErlangTable {
        ErlangTable::from_reader(include_str!("../../data/erlang_b_table.csv").as_bytes()).unwrap()
    }

    fn gsm_params() -> CellularParams {
        CellularParams {
            time_slots_per_carrier: 8,
            total_area: 100e6,
            max_number_of_users: 100_000,
            number_of_calls_per_day: 3,
            call_duration: 2.0,
            gos: 0.02,
            sir: 18.0,
            p0: 0.0,
            receiver_sensitivity: 1e-6,
            d0: 100.0,
            path_loss_exponent: 4.0,
            co_channel_interferers: 6,
        }
    }

    #[test]
    fn test_full_derivation() {
        let report = calculate(&gsm_params(), &bundled_table()).unwrap();

        assert!((report.max_distance - 3162.2777).abs() < 1e-3);
        assert!((report.max_cell_size - 25_980_762.1135).abs() < 1e-2);
        assert!((report.number_of_cells - 3.849).abs() < 1e-3);
        assert!((report.traffic_load_system - 416.6667).abs() < 1e-3);
        assert!((report.traffic_load_cell - 108.2532).abs() < 1e-3);
        assert_eq!(report.cluster.size, 7);
        assert_eq!(report.channels.column, "2%");
        assert_eq!(report.channels.channels, 121);
        assert!(!report.channels.saturated);
        assert_eq!(report.min_carriers, 106);
    }

    #[test]
    fn test_result_display() {
        let result = calculate(&gsm_params(), &bundled_table()).unwrap().to_result();

        assert_eq!(result.display("max_distance"), Some("3162.28 meters"));
        assert_eq!(result.display("max_cell_size"), Some("25980762.11 m²"));
        assert_eq!(result.display("number_of_cells"), Some("4 cells"));
        assert_eq!(result.display("traffic_load_system"), Some("416.67 Erlang"));
        assert_eq!(result.display("traffic_load_cell"), Some("108.25 Erlang"));
        assert_eq!(result.display("cluster_cells"), Some("7 cells"));
        assert_eq!(result.display("channels_needed"), Some("121 channels"));
        assert_eq!(result.display("min_carriers"), Some("106 carriers"));
        assert!(result.get("erlang_table_note").is_none());
        assert!(result.get("cluster_note").is_none());
    }

    #[test]
    fn test_display_parses_back_within_precision() {
        let result = calculate(&gsm_params(), &bundled_table()).unwrap().to_result();
        for field in result.fields() {
            if let ResultValue::Number(value) = field.value {
                let parsed = parse_display(&field.display).unwrap();
                let tolerance = if field.name == "number_of_cells" { 0.5 } else { 0.005 };
                assert!(
                    (parsed - value).abs() <= tolerance + 1e-9,
                    "{} = {} displayed as {}",
                    field.name,
                    value,
                    field.display
                );
            }
        }
    }

    #[test]
    fn test_zero_area_guards_division() {
        let params = CellularParams {
            total_area: 0.0,
            ..gsm_params()
        };
        let report = calculate(&params, &bundled_table()).unwrap();
        assert_eq!(report.number_of_cells, 0.0);
        assert_eq!(report.traffic_load_cell, 0.0);
        assert_eq!(report.channels.channels, 0);
        assert_eq!(report.min_carriers, 0);
    }

    #[test]
    fn test_zero_reference_distance_guards_division() {
        let params = CellularParams {
            d0: 0.0,
            ..gsm_params()
        };
        let report = calculate(&params, &bundled_table()).unwrap();
        assert_eq!(report.max_cell_size, 0.0);
        assert_eq!(report.number_of_cells, 0.0);
        assert_eq!(report.traffic_load_cell, 0.0);
        assert!(report.traffic_load_cell.is_finite());
    }

    #[test]
    fn test_zero_time_slots_yield_zero_carriers() {
        let params = CellularParams {
            time_slots_per_carrier: 0,
            ..gsm_params()
        };
        assert_eq!(calculate(&params, &bundled_table()).unwrap().min_carriers, 0);
    }

    #[test]
    fn test_traffic_beyond_table_is_reported() {
        let params = CellularParams {
            max_number_of_users: 10_000_000,
            ..gsm_params()
        };
        let report = calculate(&params, &bundled_table()).unwrap();
        assert!(report.channels.saturated);
        assert_eq!(report.channels.channels, 201);
        assert_eq!(report.min_carriers, 176);

        let result = report.to_result();
        assert!(result
            .display("erlang_table_note")
            .unwrap()
            .contains("assumed 201 channels"));
    }

    #[test]
    fn test_saturated_cluster_is_reported() {
        let params = CellularParams {
            sir: 40.0,
            path_loss_exponent: 2.0,
            ..gsm_params()
        };
        let report = calculate(&params, &bundled_table()).unwrap();
        assert_eq!(report.cluster.size, 300);
        assert!(report.cluster.saturated);
        assert!(report.to_result().get("cluster_note").is_some());
    }

    #[test]
    fn test_invalid_inputs() {
        let table = bundled_table();
        for (params, expected_field) in [
            (
                CellularParams {
                    receiver_sensitivity: 0.0,
                    ..gsm_params()
                },
                "receiver_sensitivity",
            ),
            (
                CellularParams {
                    path_loss_exponent: 0.0,
                    ..gsm_params()
                },
                "path_loss_exponent",
            ),
            (
                CellularParams {
                    receiver_sensitivity: -1.0,
                    ..gsm_params()
                },
                "receiver_sensitivity",
            ),
            (
                CellularParams {
                    co_channel_interferers: -6,
                    ..gsm_params()
                },
                "co_channel_interferers",
            ),
            (
                CellularParams {
                    gos: 1.2,
                    ..gsm_params()
                },
                "gos",
            ),
        ] {
            match calculate(&params, &table) {
                Err(CalcError::InvalidInputError { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected invalid {}, got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn test_negative_interferers_never_pick_a_cluster() {
        let input = CalculationInput::from_json(&json!({
            "time_slots_per_carrier": 8,
            "total_area": 100000000,
            "max_number_of_users": 100000,
            "number_of_calls_per_day": 3,
            "call_duration": 2,
            "gos": 0.02,
            "sir": 18,
            "p0": 0,
            "receiver_sensitivity": 0.000001,
            "d0": 100,
            "path_loss_exponent": 4,
            "co_channel_interferers": -1
        }))
        .unwrap();
        let params = CellularParams::from_input(&input).unwrap();
        assert!(calculate(&params, &bundled_table()).is_err());
    }

    #[test]
    fn test_zero_interferers_select_smallest_cluster() {
        let params = CellularParams {
            co_channel_interferers: 0,
            ..gsm_params()
        };
        let report = calculate(&params, &bundled_table()).unwrap();
        assert_eq!(report.cluster.size, 1);
        assert!(!report.cluster.saturated);
    }

    #[test]
    fn test_params_from_input() {
        let input = CalculationInput::from_json(&json!({
            "time_slots_per_carrier": 8,
            "total_area": 100000000,
            "max_number_of_users": "100000",
            "number_of_calls_per_day": 3,
            "call_duration": 2,
            "gos": 0.02,
            "sir": 18,
            "p0": 0,
            "receiver_sensitivity": 0.000001,
            "d0": 100,
            "path_loss_exponent": 4,
            "co_channel_interferers": 6
        }))
        .unwrap();
        assert_eq!(CellularParams::from_input(&input).unwrap(), gsm_params());
    }
}
