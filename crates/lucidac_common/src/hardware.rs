//! Fixed dimensions of a single LUCIDAC cluster.

/// Number of coefficient-weighted lanes through the C block.
pub const NUM_LANES: usize = 32;

/// Number of cross-lanes on each side of the switching matrix.
pub const NUM_CLANES: usize = 16;

/// Number of M-block slots in a cluster.
pub const NUM_SLOTS: usize = 2;

/// Number of cross-lanes wired to a single M-block slot.
pub const CLANES_PER_SLOT: usize = NUM_CLANES / NUM_SLOTS;

/// Number of integrators on one integrator block.
pub const NUM_INTEGRATORS: usize = 8;

/// Largest coefficient magnitude a digital potentiometer can hold.
pub const MAX_COEFFICIENT: f64 = 20.0;
