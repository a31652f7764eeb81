/// Command-line interface and batch processing
pub mod cli;
/// Constants and default parameters
pub mod configuration;
/// Error types for the whole crate
pub mod error;
/// Symbol canvas rendering and PNG export
pub mod image;
/// Progress bars for batch runs
pub mod progress;
/// Symbol rasters and PNG sample loading
pub mod raster;
/// Receivers for collapsed cells
pub mod sink;
/// Collapse-order animation export
pub mod visualization;
