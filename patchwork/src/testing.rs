//! Helpers shared by the unit tests.

use crate::point::{PointId, PointRegistry};

/// Initialize tracing once per test binary. Respects RUST_LOG.
pub fn init_tracing() {
    common::log_setup::init_test_tracing();
}

/// Registry holding bare points at `positions`, all remaining.
pub fn registry_with(positions: &[(f64, f64)]) -> (PointRegistry, Vec<PointId>) {
    let mut registry = PointRegistry::new();
    let ids = positions
        .iter()
        .map(|&(x, y)| registry.register(x, y, 0.0).unwrap())
        .collect();
    (registry, ids)
}
