// src/validate/mod.rs

//! The incremental validation task: change set in, one tool run per changed
//! file, one output record out.

pub mod record;
pub mod runner;

pub use record::OutputRecord;
pub use runner::{RunOutcome, ValidationRequest, ValidationRunner};
