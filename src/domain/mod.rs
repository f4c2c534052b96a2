// Domain layer: row models, chart outputs and ports. No storage or HTTP concerns here.

pub mod chart;
pub mod model;
pub mod ports;
pub mod report;
