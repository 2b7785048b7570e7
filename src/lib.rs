pub mod error;
pub mod measure;
pub mod pop;
pub mod rate;
pub mod sampler;
pub mod sim;

pub use error::{Result, SchonError};
pub use sim::Simulation;

#[cfg(test)]
mod test;
