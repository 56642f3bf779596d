mod batch;
mod credentials;
mod event;
mod failure_mode;
mod params;
mod record;

pub use batch::Batch;
pub use credentials::Credentials;
pub use event::CollectedEvent;
pub use failure_mode::FailureMode;
pub use params::ConnectionParams;
pub use record::OutputRecord;
