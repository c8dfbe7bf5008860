//! Recalculates the derived status and arrival-estimate columns of an active
//! bag report and reports where the uploaded values drifted from them.

pub mod config;
pub mod drift;
pub mod engine;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod server;
