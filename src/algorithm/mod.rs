/// Bitset over pattern indices for domains and adjacency sets
pub mod bitset;
/// Solver state machine and run configuration
pub mod executor;
/// Constraint propagation with an explicit worklist
pub mod propagation;
/// Seeded randomness, observation and weighted collapse
pub mod selection;
/// Per-cell domains and uncertainty values
pub mod wave;
