// Domain layer: models and ports. No HTTP or filesystem here.

pub mod model;
pub mod ports;
