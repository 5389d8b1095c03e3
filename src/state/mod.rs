//! Simulation state: the flat per-time-point state vector and its layout.

mod layout;
mod pool;

pub use layout::StateLayout;
pub use pool::StatePool;
