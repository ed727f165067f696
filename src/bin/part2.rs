use anyhow::{Context, Result};
use clap::Parser;
use day12::CLIArgs;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let map = day12::read_map(&args.input_path, args.lenient).with_context(|| {
        format!(
            "Failed to read height map from given file({}).",
            args.input_path.display()
        )
    })?;

    let end_pos = map.end_pos();
    let fewest_steps_n = map
        .fewest_steps_from_lowest(args.heuristic, args.strategy)
        .with_context(|| {
            format!(
                "Failed to search paths from lowest positions to {}.",
                end_pos
            )
        })?;
    if let Some(steps_n) = fewest_steps_n {
        println!(
            "It takes at least {} steps moving from any lowest position to {}.",
            steps_n, end_pos
        );
    } else {
        eprintln!("There's no path from any lowest position to {}.", end_pos);
    }

    Ok(())
}
