// Domain layer: scenario/input/result models and ports (interfaces).

pub mod model;
pub mod ports;
