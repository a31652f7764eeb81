//! Sample analysis: pattern extraction and the adjacency model built from it

/// Legal neighbor relation between extracted patterns
pub mod adjacency;
/// Pattern extraction with occurrence counting
pub mod patterns;
