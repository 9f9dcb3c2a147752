// Domain layer: records, page identifiers and the ports the orchestrator talks through.

pub mod model;
pub mod ports;
