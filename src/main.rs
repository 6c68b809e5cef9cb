//! Headless Tetris Ultimate runner (default binary).
//!
//! Plays the AI demo for a fixed number of 16 ms frames and prints a summary.
//! Rendering, audio and input devices live outside this workspace; this binary
//! is the smoke test for the simulation core.
//!
//! ```text
//! tetris-ultimate [--seed N] [--ticks N] [--config PATH] [--difficulty NAME] [--log PATH] [--no-demo]
//! ```

use anyhow::Result;

use tetris_ultimate::run::{run_headless, RunConfig};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = RunConfig::from_env().with_args(&args)?;

    eprintln!(
        "[Demo] seed {} ticks {}{}",
        run.seed,
        run.ticks,
        run.log_path
            .as_ref()
            .map(|p| format!(" log {}", p.display()))
            .unwrap_or_default()
    );

    let summary = run_headless(&run)?;
    println!(
        "games={} pieces={} lines={} best_score={}",
        summary.games, summary.pieces, summary.total_lines, summary.best_score
    );
    Ok(())
}
