pub mod ports;
mod run_batch;

pub use run_batch::BatchBuilder;
