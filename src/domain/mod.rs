// Domain layer: the calendar record, run results and the ports adapters plug into.

pub mod model;
pub mod ports;
