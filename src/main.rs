//! CLI entry point for overlapping-model texture synthesis

use clap::Parser;
use wavetile::io::cli::{Cli, FileProcessor};

fn main() -> wavetile::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
