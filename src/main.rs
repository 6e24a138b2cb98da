use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use fetchplan::PlanError;
use fetchplan::chunk::Chunk;
use fetchplan::parse;
use fetchplan::search::{SearchOptions, solve_with};

/// Plan the cheapest request sequence that assembles a byte range from
/// overlapping chunks.
#[derive(Parser)]
#[command(name = "fetchplan")]
struct Args {
    /// Problem description file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Emit the result as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Cancel the whole search on the first uncoverable position instead of
    /// letting only that branch die
    #[arg(long)]
    abort_on_gap: bool,
}

#[derive(serde::Serialize)]
struct Report {
    target: u64,
    best_cost: Option<f64>,
    best_sequence: Option<Vec<Chunk>>,
}

fn main() -> Result<(), PlanError> {
    let args = Args::parse();

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let problem = parse::problem(&text)?;
    let solution = solve_with(
        problem.target,
        problem.model,
        problem.chunks,
        SearchOptions {
            abort_on_gap: args.abort_on_gap,
        },
    );

    if args.json {
        let report = Report {
            target: problem.target,
            best_cost: solution.best_cost,
            best_sequence: solution.best_sequence,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(sequence) = &solution.best_sequence {
        for chunk in sequence {
            eprintln!("{}", chunk);
        }
    }
    match solution.best_cost {
        Some(cost) => println!("{:.3}", cost),
        None => eprintln!("[fetchplan] no chunk sequence covers the target range"),
    }
    Ok(())
}
