// Domain layer: calibration models and ports (interfaces). No terminal or file I/O here.

pub mod model;
pub mod ports;
