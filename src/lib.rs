use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

pub mod heuristic;
pub mod map;
pub mod search;

pub use heuristic::Heuristic;
pub use map::{Direction, Elevation, Map, MapBuilder, Position, Strategy};
pub use search::{PathFinder, SearchError, SearchReport};

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Estimate of the remaining steps used to order the search.
    #[arg(long, value_enum, default_value_t = Heuristic::Euclidean)]
    pub heuristic: Heuristic,
    /// Treat unknown characters as impassable squares instead of failing.
    #[arg(long)]
    pub lenient: bool,
    /// Draw the found path over the map.
    #[arg(long)]
    pub show_path: bool,
    /// How to search from every lowest square.
    #[arg(long, value_enum, default_value_t = Strategy::Independent)]
    pub strategy: Strategy,
}

pub fn read_map<P: AsRef<Path>>(path: P, lenient: bool) -> Result<Map> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut builder = MapBuilder::new().lenient(lenient);
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} in given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        builder
            .add_row(line.as_str())
            .with_context(|| format!("Failed to parse line {} of height map.", ind + 1))?;
    }

    Ok(builder.build()?)
}
