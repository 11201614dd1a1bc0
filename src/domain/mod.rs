// Domain layer: models and ports. No process or file-system access here.

pub mod model;
pub mod ports;
