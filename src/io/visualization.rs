//! Collapse animation: frame capture and GIF generation

use crate::analysis::patterns::Pattern;
use crate::io::configuration::{MAX_GIF_FRAMES, VIEWER_MIN_FRAME_DELAY_MS};
use crate::io::error::{Result, SynthesisError, file_system_error};
use crate::io::image::{SymbolCanvas, render_canvas, validate_scale};
use crate::io::sink::OutputSink;
use crate::spatial::grid::ToroidalGrid;
use image::{Delay, Frame};
use std::path::Path;

/// A single emitted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    /// Row-major cell index
    pub cell: usize,
    /// Anchor symbol drawn for the cell
    pub symbol: usize,
    /// Position in emission order, starting at 1
    pub order: usize,
}

/// Records emitted cells to replay the collapse order as an animation
pub struct VisualizationCapture {
    placements: Vec<CellPlacement>,
    grid: ToroidalGrid,
    palette: Vec<[u8; 4]>,
    scale: u32,
}

impl VisualizationCapture {
    /// Create a capture for `grid`, drawing cells at `scale` pixels per side
    pub fn new(grid: ToroidalGrid, palette: Vec<[u8; 4]>, scale: u32) -> Self {
        Self {
            placements: Vec::with_capacity(grid.cell_count()),
            grid,
            palette,
            scale,
        }
    }

    /// Records a cell being drawn with `symbol`
    pub fn record_placement(&mut self, cell: usize, symbol: usize) {
        let order = self.placements.len() + 1;
        self.placements.push(CellPlacement {
            cell,
            symbol,
            order,
        });
    }

    /// Returns all recorded placement events
    pub fn get_placements(&self) -> &[CellPlacement] {
        &self.placements
    }

    /// Returns the total number of placement events
    pub const fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Number of placements folded into each frame
    ///
    /// Honours the minimum delay viewers support and caps the frame count at
    /// [`MAX_GIF_FRAMES`].
    pub fn skip_factor(&self, frame_delay_ms: u32) -> usize {
        let delay_skip = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1)) as usize
        } else {
            1
        };
        let frame_cap_skip = self.placements.len().div_ceil(MAX_GIF_FRAMES).max(1);
        delay_skip.max(frame_cap_skip)
    }

    /// Export the captured placements as a GIF
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No placements were captured
    /// - The cell scale is out of range or a symbol has no palette colour
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.placements.is_empty() {
            return Err(SynthesisError::InvalidSourceData {
                reason: "No cell placements captured for visualization".to_string(),
            });
        }
        validate_scale(self.scale)?;

        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let frames = self.generate_frames(effective_delay_ms, self.skip_factor(frame_delay_ms))?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| file_system_error(parent, "create directory", e))?;
        }

        let file = std::fs::File::create(output_path)
            .map_err(|e| file_system_error(output_path, "create file", e))?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| SynthesisError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Result<Vec<Frame>> {
        let mut canvas = SymbolCanvas::new(self.grid);
        let mut frames = vec![self.render_frame(&canvas, delay_ms)?];

        for placement in &self.placements {
            canvas.set(placement.cell, placement.symbol);
            if placement.order % skip_factor == 0 {
                frames.push(self.render_frame(&canvas, delay_ms)?);
            }
        }

        if self.placements.len() % skip_factor != 0 {
            frames.push(self.render_frame(&canvas, delay_ms)?);
        }

        // Final frame displays longer for better visibility
        frames.push(self.render_frame(&canvas, delay_ms * 25)?);

        Ok(frames)
    }

    fn render_frame(&self, canvas: &SymbolCanvas, delay_ms: u32) -> Result<Frame> {
        let img = render_canvas(canvas, &self.palette, self.scale)?;
        Ok(Frame::from_parts(
            img,
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        ))
    }
}

impl OutputSink<usize> for VisualizationCapture {
    fn emit(&mut self, cell: usize, pattern: &Pattern<usize>) {
        self.record_placement(cell, pattern.anchor());
    }
}
