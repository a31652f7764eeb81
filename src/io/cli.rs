//! Command-line interface for batch processing PNG samples into synthesized images

use crate::algorithm::executor::{Solver, SolverConfig, SolverStatus, StepOutcome};
use crate::io::configuration::{
    DEFAULT_CELL_SCALE, DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, DEFAULT_PATTERN_SIZE,
    DEFAULT_SEED, GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX, TIE_BREAK_EPSILON, VISUALIZATION_SUFFIX,
};
use crate::io::error::{Result, file_system_error, invalid_parameter};
use crate::io::image::{SymbolCanvas, export_canvas_as_png, validate_scale};
use crate::io::progress::{FileStatus, ProgressManager};
use crate::io::raster::SourceImage;
use crate::io::visualization::VisualizationCapture;
use crate::spatial::window::SymmetryMode;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "wavetile")]
#[command(
    author,
    version,
    about = "Synthesize images with the overlapping wave function collapse model"
)]
/// Command-line arguments for the synthesis tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output width in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_OUTPUT_WIDTH)]
    pub width: usize,

    /// Output height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_OUTPUT_HEIGHT)]
    pub height: usize,

    /// Side length of the extracted patterns
    #[arg(short = 'n', long, default_value_t = DEFAULT_PATTERN_SIZE)]
    pub pattern_size: usize,

    /// Stop after this many collapses even if the grid is unfinished
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Output pixels per cell side
    #[arg(short = 'x', long, default_value_t = DEFAULT_CELL_SCALE)]
    pub scale: u32,

    /// Write the collapse order as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output and informational logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every collapse
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Process files even if output exists
    #[arg(long)]
    pub no_skip: bool,

    /// Do not add rotated patterns (90°, 180°, 270°)
    #[arg(long)]
    pub no_rotations: bool,

    /// Do not add mirrored patterns
    #[arg(long)]
    pub no_reflections: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Most detailed log level to emit
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Symmetry variants requested on the command line
    pub const fn symmetry(&self) -> SymmetryMode {
        SymmetryMode {
            rotations: !self.no_rotations,
            reflections: !self.no_reflections,
        }
    }

    /// Solver configuration described by these arguments
    pub const fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            width: self.width,
            height: self.height,
            pattern_size: self.pattern_size,
            seed: self.seed,
            symmetry: self.symmetry(),
            tie_break_epsilon: TIE_BREAK_EPSILON,
        }
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// A contradiction is reported but does not fail the batch: the partial
    /// result is still written.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the target cannot be
    /// read, or an output cannot be written
    pub fn process(&mut self) -> Result<()> {
        self.cli.solver_config().validate_output()?;
        validate_scale(self.cli.scale)?;

        let files = self.collect_files()?;

        if files.is_empty() {
            tracing::info!(path = %self.cli.target.display(), "nothing to process");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if target.extension().and_then(|s| s.to_str()) == Some("png") {
                if self.should_process_file(target) {
                    Ok(vec![target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"Target file must be a PNG image",
                ))
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            let entries = std::fs::read_dir(target)
                .map_err(|e| file_system_error(target.as_path(), "read directory", e))?;
            for entry in entries {
                let path = entry
                    .map_err(|e| file_system_error(target.as_path(), "read directory", e))?
                    .path();
                if path.extension().and_then(|s| s.to_str()) == Some("png")
                    && !Self::is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"Target must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            tracing::info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let source = SourceImage::from_png_file(input_path)?;
        let mut solver = Solver::new(&source, self.cli.solver_config())?;

        tracing::info!(
            input = %input_path.display(),
            patterns = solver.patterns().len(),
            cells = solver.grid().cell_count(),
            "synthesizing"
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, solver.grid().cell_count());
        }

        let mut canvas = SymbolCanvas::new(*solver.grid());
        let mut visualization = self.cli.visualize.then(|| {
            VisualizationCapture::new(
                *solver.grid(),
                source.palette().to_vec(),
                self.cli.scale,
            )
        });

        let mut collapsed = 0;
        loop {
            if self
                .cli
                .iterations
                .is_some_and(|limit| collapsed >= limit && !solver.wave().is_settled())
            {
                break;
            }
            match solver.step_with(&mut (&mut canvas, visualization.as_mut())) {
                StepOutcome::Collapsed(_) => {
                    collapsed += 1;
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.update_cells(index, collapsed);
                    }
                }
                StepOutcome::Complete | StepOutcome::Contradiction(_) => break,
            }
        }

        let status = match solver.status() {
            SolverStatus::Complete => FileStatus::Complete,
            SolverStatus::Contradiction(contradiction) => {
                tracing::warn!(
                    input = %input_path.display(),
                    cell = contradiction.cell,
                    collapsed,
                    "contradiction, writing partial result"
                );
                FileStatus::Contradiction
            }
            SolverStatus::Running => FileStatus::Stopped,
        };

        let output_path = Self::get_output_path(input_path);
        export_canvas_as_png(&canvas, source.palette(), &output_path, self.cli.scale)?;

        if let Some(viz) = visualization
            .as_ref()
            .filter(|viz| viz.placement_count() > 0)
        {
            viz.export_gif(&Self::get_visualization_path(input_path), GIF_FRAME_DELAY_MS)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, status);
        }

        tracing::info!(
            output = %output_path.display(),
            collapsed,
            status = ?status,
            elapsed_ms = start_time.elapsed().as_millis(),
            "finished"
        );

        Ok(())
    }

    fn is_generated_output(path: &Path) -> bool {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
    }

    /// Path of the PNG result written for `input_path`
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, OUTPUT_SUFFIX, "png")
    }

    /// Path of the collapse animation written for `input_path`
    pub fn get_visualization_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, VISUALIZATION_SUFFIX, "gif")
    }

    fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }
}
