use anyhow::{Context, Result};
use clap::Parser;
use day12::{CLIArgs, PathFinder};

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let map = day12::read_map(&args.input_path, args.lenient).with_context(|| {
        format!(
            "Failed to read height map from given file({}).",
            args.input_path.display()
        )
    })?;

    let (start_pos, end_pos) = (map.start_pos(), map.end_pos());
    let report = PathFinder::new(&map, args.heuristic)
        .search(start_pos, end_pos)
        .with_context(|| {
            format!(
                "Failed to search path from {} to {}.",
                start_pos, end_pos
            )
        })?;
    if let (Some(path), Some(steps_n)) = (report.path(), report.steps_n()) {
        println!(
            "It takes at least {} steps moving from {} to {}.",
            steps_n, start_pos, end_pos
        );
        if args.show_path {
            println!("{}", map.path_view(path));
        }
    } else {
        eprintln!("There's no path from {} to {}.", start_pos, end_pos);
    }

    Ok(())
}
