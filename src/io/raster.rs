//! Input rasters: the symbol source interface and PNG decoding
//!
//! The extractor only ever asks a raster for its dimensions and for the symbol
//! at an in-range `(x, y)`; wraparound is handled on the extractor side.

use crate::io::error::{Result, SynthesisError};
use image::RgbaImage;
use ndarray::Array2;
use std::collections::BTreeSet;
use std::path::Path;

/// Read-only 2-D source of symbols
pub trait SymbolRaster<S> {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    /// Symbol at column `x`, row `y`, or `None` when out of range
    fn symbol(&self, x: usize, y: usize) -> Option<S>;

    /// Check whether the raster holds no symbols at all
    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

// Arrays are indexed (row, col), i.e. (y, x)
impl<S: Copy> SymbolRaster<S> for Array2<S> {
    fn width(&self) -> usize {
        self.ncols()
    }

    fn height(&self) -> usize {
        self.nrows()
    }

    fn symbol(&self, x: usize, y: usize) -> Option<S> {
        self.get((y, x)).copied()
    }
}

/// Source image converted to a grid of palette indices
///
/// Every distinct RGBA colour becomes one symbol. The palette is sorted so
/// the same image always yields the same symbol assignment.
#[derive(Debug, Clone)]
pub struct SourceImage {
    symbols: Array2<usize>,
    palette: Vec<[u8; 4]>,
}

impl SourceImage {
    /// Load and label an image from a PNG file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file at the given path cannot be opened or read
    /// - The file is not a valid image format
    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let img = image::open(&path_buf).map_err(|e| SynthesisError::ImageLoad {
            path: path_buf,
            source: e,
        })?;
        Ok(Self::from_rgba_image(&img.to_rgba8()))
    }

    /// Label every pixel of an RGBA image with its palette index
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let palette_set: BTreeSet<[u8; 4]> = img.pixels().map(|pixel| pixel.0).collect();
        let palette: Vec<[u8; 4]> = palette_set.into_iter().collect();

        let (width, height) = (img.width() as usize, img.height() as usize);
        let mut symbols = Array2::zeros((height, width));
        for (x, y, pixel) in img.enumerate_pixels() {
            if let (Ok(index), Some(cell)) = (
                palette.binary_search(&pixel.0),
                symbols.get_mut((y as usize, x as usize)),
            ) {
                *cell = index;
            }
        }

        Self { symbols, palette }
    }

    /// Get the symbol grid (rows, cols)
    pub const fn symbols(&self) -> &Array2<usize> {
        &self.symbols
    }

    /// Get the RGBA colour of every symbol, indexed by symbol
    pub fn palette(&self) -> &[[u8; 4]] {
        &self.palette
    }

    /// Look up the colour of a single symbol
    pub fn color(&self, symbol: usize) -> Option<[u8; 4]> {
        self.palette.get(symbol).copied()
    }

    /// Consume the image and return the symbol grid and palette
    pub fn into_parts(self) -> (Array2<usize>, Vec<[u8; 4]>) {
        (self.symbols, self.palette)
    }
}

impl SymbolRaster<usize> for SourceImage {
    fn width(&self) -> usize {
        self.symbols.ncols()
    }

    fn height(&self) -> usize {
        self.symbols.nrows()
    }

    fn symbol(&self, x: usize, y: usize) -> Option<usize> {
        self.symbols.get((y, x)).copied()
    }
}
