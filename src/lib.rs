pub mod batch;
pub mod classify;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod parse;
pub mod repair;
pub mod report;
pub mod validate;
pub mod wasm;

pub use orchestrator::{Validator, validate_and_repair, validate_json};
