// tests/property/main.rs

mod change_partition;
mod scheduler;
