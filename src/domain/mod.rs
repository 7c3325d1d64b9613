// Domain layer - Workflow types and invariants

pub mod errors;
pub mod model;
pub mod rules;
