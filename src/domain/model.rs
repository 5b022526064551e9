use crate::utils::error::{CalcError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The four calculators exposed at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    TransmissionChain,
    Ofdm,
    LinkBudget,
    Cellular,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::TransmissionChain,
        Scenario::Ofdm,
        Scenario::LinkBudget,
        Scenario::Cellular,
    ];

    /// Route segment under `/calculate/`.
    pub fn route(&self) -> &'static str {
        match self {
            Scenario::TransmissionChain => "wireless",
            Scenario::Ofdm => "ofdm",
            Scenario::LinkBudget => "linkbudget",
            Scenario::Cellular => "cellular",
        }
    }

    /// Name handed to the explanation generator.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::TransmissionChain => "wireless",
            Scenario::Ofdm => "ofdm",
            Scenario::LinkBudget => "bidirectional_link_budget",
            Scenario::Cellular => "cellular",
        }
    }

    /// `bidirectional_link_budget` -> `Bidirectional Link Budget`
    pub fn title(&self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.route() == needle || scenario.name() == needle)
            .ok_or_else(|| CalcError::UnknownScenarioError(s.to_string()))
    }
}

/// Flat mapping of named numeric parameters taken from a request body.
///
/// Absent fields read as zero. Numbers and numeric strings are accepted.
#[derive(Debug, Clone, Default)]
pub struct CalculationInput {
    fields: Map<String, Value>,
}

impl CalculationInput {
    pub fn from_json(body: &Value) -> Result<Self> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields: fields.clone(),
            }),
            other => Err(CalcError::invalid_input(
                "body",
                format!("request body must be a JSON object, got {}", json_kind(other)),
            )),
        }
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        match self.fields.get(name) {
            None => Ok(0.0),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| CalcError::invalid_input(name, "number is out of range")),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                CalcError::invalid_input(name, format!("could not convert string to number: '{}'", s))
            }),
            Some(other) => Err(CalcError::invalid_input(
                name,
                format!("expected a number, got {}", json_kind(other)),
            )),
        }
    }

    /// Integer parameters: JSON numbers are truncated toward zero, strings must be integral.
    pub fn integer(&self, name: &str) -> Result<i64> {
        match self.fields.get(name) {
            None => Ok(0),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(i);
                }
                // 超出 i64 範圍的數值不做飽和截斷
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(f.trunc() as i64)
                    }
                    _ => Err(CalcError::invalid_input(name, "number is out of range")),
                }
            }
            Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| {
                CalcError::invalid_input(name, format!("invalid literal for an integer: '{}'", s))
            }),
            Some(other) => Err(CalcError::invalid_input(
                name,
                format!("expected an integer, got {}", json_kind(other)),
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultValue {
    Number(f64),
    Count(u64),
    Flag(bool),
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultField {
    pub name: String,
    pub value: ResultValue,
    pub display: String,
}

/// Named derived values, each paired with a unit-annotated display string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationResult {
    fields: Vec<ResultField>,
}

impl CalculationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: ResultValue, display: String) {
        self.fields.push(ResultField {
            name: name.to_string(),
            value,
            display,
        });
    }

    pub fn fields(&self) -> &[ResultField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&ResultField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn display(&self, name: &str) -> Option<&str> {
        self.get(name).map(|field| field.display.as_str())
    }

    pub fn display_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), Value::String(field.display.clone())))
            .collect()
    }
}

/// Response envelope returned for every calculation request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CalculationResponse {
    Success {
        success: bool,
        results: Map<String, Value>,
        explanation: String,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl CalculationResponse {
    pub fn success(result: &CalculationResult, explanation: String) -> Self {
        CalculationResponse::Success {
            success: true,
            results: result.display_map(),
            explanation,
        }
    }

    pub fn failure(error: &CalcError) -> Self {
        CalculationResponse::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CalculationResponse::Success { .. })
    }

    pub fn status_code(&self) -> u16 {
        if self.is_success() {
            200
        } else {
            400
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub message: String,
    pub version: String,
}
