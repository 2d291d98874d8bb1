//! Top-level facade crate for simplemetrics.
//!
//! Re-exports the metric primitives and the manager so users can depend on a single crate.

pub mod core {
    pub use simplemetrics_core::*;
}

pub mod manager {
    pub use simplemetrics_manager::*;
}
