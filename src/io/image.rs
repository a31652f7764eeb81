//! Result canvas and PNG export with per-cell scaling

use crate::analysis::patterns::Pattern;
use crate::io::configuration::MAX_CELL_SCALE;
use crate::io::error::{Result, SynthesisError, file_system_error, invalid_parameter};
use crate::io::sink::OutputSink;
use crate::spatial::grid::ToroidalGrid;
use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::Array2;
use std::path::Path;

/// Output grid of emitted anchor symbols
///
/// Cells that were never emitted stay `None`, which is the normal state of a
/// run that stopped on a contradiction or on its step budget.
#[derive(Debug, Clone)]
pub struct SymbolCanvas {
    grid: ToroidalGrid,
    cells: Array2<Option<usize>>,
}

impl SymbolCanvas {
    /// Create an empty canvas covering `grid`
    pub fn new(grid: ToroidalGrid) -> Self {
        Self {
            grid,
            cells: Array2::from_elem((grid.height(), grid.width()), None),
        }
    }

    /// Symbol at `(x, y)` if that cell was emitted
    pub fn symbol_at(&self, x: usize, y: usize) -> Option<usize> {
        self.cells.get((y, x)).copied().flatten()
    }

    /// Emitted symbols shaped (height, width)
    pub const fn cells(&self) -> &Array2<Option<usize>> {
        &self.cells
    }

    /// Number of emitted cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Write a symbol directly into a cell
    pub fn set(&mut self, cell: usize, symbol: usize) {
        let (x, y) = self.grid.coordinates(cell);
        if let Some(slot) = self.cells.get_mut((y, x)) {
            *slot = Some(symbol);
        }
    }
}

impl OutputSink<usize> for SymbolCanvas {
    fn emit(&mut self, cell: usize, pattern: &Pattern<usize>) {
        self.set(cell, pattern.anchor());
    }
}

/// Average colour of a palette, drawn for cells that hold no symbol
pub fn empty_color(palette: &[[u8; 4]]) -> [u8; 4] {
    if palette.is_empty() {
        return [128, 128, 128, 255];
    }

    let mut sums = [0u32; 4];
    for color in palette {
        for (sum, &channel) in sums.iter_mut().zip(color) {
            *sum += u32::from(channel);
        }
    }

    let count = palette.len() as u32;
    sums.map(|sum| (sum / count) as u8)
}

/// Check a cell scale lies in `1..=MAX_CELL_SCALE`
///
/// # Errors
///
/// Returns `InvalidParameter` naming `scale` when it is out of range
pub fn validate_scale(scale: u32) -> Result<()> {
    if (1..=MAX_CELL_SCALE).contains(&scale) {
        Ok(())
    } else {
        Err(invalid_parameter(
            "scale",
            &scale,
            &format!("must be between 1 and {MAX_CELL_SCALE}"),
        ))
    }
}

/// Pixel length of `cells` cells drawn `scale` pixels wide
fn scaled_length(cells: usize, scale: u32) -> Result<u32> {
    u32::try_from(cells)
        .ok()
        .and_then(|cells| cells.checked_mul(scale))
        .ok_or_else(|| invalid_parameter("scale", &scale, &"image exceeds the pixel range"))
}

/// Render a canvas with every cell drawn as a `scale` × `scale` square
///
/// # Errors
///
/// Returns an error if:
/// - `scale` is zero or above `MAX_CELL_SCALE`
/// - The scaled image does not fit `u32` pixel coordinates
/// - An emitted symbol has no palette colour
pub fn render_canvas(canvas: &SymbolCanvas, palette: &[[u8; 4]], scale: u32) -> Result<RgbaImage> {
    validate_scale(scale)?;

    let (rows, cols) = canvas.cells().dim();
    let width = scaled_length(cols, scale)?;
    let height = scaled_length(rows, scale)?;
    let background = empty_color(palette);
    let mut img: RgbaImage = ImageBuffer::new(width, height);

    for ((row, col), cell) in canvas.cells().indexed_iter() {
        let rgba = match *cell {
            Some(symbol) => {
                palette
                    .get(symbol)
                    .copied()
                    .ok_or(SynthesisError::InvalidSymbol {
                        symbol,
                        palette_size: palette.len(),
                    })?
            }
            None => background,
        };

        let (left, top) = (scaled_length(col, scale)?, scaled_length(row, scale)?);
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(left + dx, top + dy, Rgba(rgba));
            }
        }
    }

    Ok(img)
}

/// Export a canvas as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - Rendering fails (see [`render_canvas`])
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_canvas_as_png(
    canvas: &SymbolCanvas,
    palette: &[[u8; 4]],
    output_path: &Path,
    scale: u32,
) -> Result<()> {
    let img = render_canvas(canvas, palette, scale)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system_error(parent, "create directory", e))?;
    }

    img.save(output_path)
        .map_err(|e| SynthesisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
