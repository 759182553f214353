// tests/integration/main.rs

mod build_run;
mod error_handling;
mod fs_abstraction;
mod validation_pipeline;
