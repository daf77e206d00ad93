//! mtextstrip CLI: remove inline formatting from drawing text.
//!
//! Reads a drawing document, strips the selected formatting categories from
//! every text-bearing entity, and writes the drawing back.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
