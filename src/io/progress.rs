//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// How a file's run ended, shown as a prefix on its bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Still collapsing cells
    Running,
    /// Every cell was collapsed
    Complete,
    /// The run stopped on a contradiction
    Contradiction,
    /// The step budget ran out
    Stopped,
}

impl FileStatus {
    const fn marker(self) -> &'static str {
        match self {
            Self::Running => "",
            Self::Complete => "✓ ",
            Self::Contradiction => "✗ ",
            Self::Stopped => "… ",
        }
    }
}

#[derive(Debug, Clone)]
struct FileState {
    name: String,
    collapsed: usize,
    total: usize,
    status: FileStatus,
}

/// Coordinates progress display for batch operations
///
/// Automatically switches between individual progress bars (for small batches)
/// and a single batch progress bar (for large batches) based on file count
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
    file_states: Vec<Option<FileState>>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
            file_states: Vec::new(),
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Number of files this manager was initialized for
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Configure progress bar for a new file with `total_cells` to collapse
    pub fn start_file(&mut self, index: usize, path: &Path, total_cells: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, None);
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = Some(FileState {
                name,
                collapsed: 0,
                total: total_cells,
                status: FileStatus::Running,
            });
        }
        self.update_bars();
    }

    /// Report the number of collapsed cells
    pub fn update_cells(&mut self, file_index: usize, collapsed: usize) {
        if let Some(Some(state)) = self.file_states.get_mut(file_index) {
            state.collapsed = collapsed;
        }
        self.update_bars();
    }

    /// Mark file as finished and update batch progress
    pub fn complete_file(&mut self, index: usize, status: FileStatus) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(Some(state)) = self.file_states.get_mut(index) {
            state.status = status;
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Update all progress bars to show the last N active files
    fn update_bars(&self) {
        let active: Vec<&FileState> = self.file_states.iter().flatten().collect();
        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, state) in visible.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(state.total as u64);
                bar.set_position(state.collapsed as u64);
                let width = state.total.to_string().len();
                bar.set_message(format!("{:>width$}/{}", state.collapsed, state.total));
                bar.set_prefix(format!("{}{}", state.status.marker(), state.name));
            }
        }

        // Clear any unused bars
        for bar_idx in visible.len()..self.file_bars.len() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}
