//! Solver constants and runtime configuration defaults

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default output grid width in cells
pub const DEFAULT_OUTPUT_WIDTH: usize = 96;

/// Default output grid height in cells
pub const DEFAULT_OUTPUT_HEIGHT: usize = 50;

/// Default side length of extracted patterns
pub const DEFAULT_PATTERN_SIZE: usize = 3;

/// Default number of output pixels per cell side
pub const DEFAULT_CELL_SCALE: u32 = 9;

// Upper bound on the random amount subtracted from a cell's uncertainty.
// Must stay below 1 so cells with fewer candidates are always observed first.
/// Tie-break perturbation range for uncertainty values
pub const TIE_BREAK_EPSILON: f64 = 0.1;

// Safety limits to prevent excessive memory allocation
/// Maximum allowed output grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Maximum allowed pattern side length
pub const MAX_PATTERN_SIZE: usize = 16;

/// Maximum output pixels per cell side
pub const MAX_CELL_SCALE: u32 = 64;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Suffix added to collapse animation filenames
pub const VISUALIZATION_SUFFIX: &str = "_collapse";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Upper bound on frames written to a collapse animation
pub const MAX_GIF_FRAMES: usize = 400;
