mod collector;
mod resolver;
mod transport;

pub use collector::Collector;
pub use resolver::{FnResolver, ParameterResolver};
pub use transport::Transport;
