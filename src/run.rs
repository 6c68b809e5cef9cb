//! Headless runner: drives a [`Session`] at a fixed tick for a bounded number
//! of frames and reports what happened.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::core::{Difficulty, GameConfig};
use crate::engine::Session;
use crate::types::{LockEvent, TICK_MS};

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub seed: u64,
    pub ticks: u32,
    pub config_path: Option<PathBuf>,
    pub difficulty: Option<Difficulty>,
    pub log_path: Option<PathBuf>,
    /// Run without the demo pilot (the game just falls)
    pub no_demo: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            ticks: 60 * 1000 / TICK_MS,
            config_path: None,
            difficulty: None,
            log_path: None,
            no_demo: false,
        }
    }
}

impl RunConfig {
    /// Defaults overridden by `TETRIS_CONFIG`, `TETRIS_SEED`, `TETRIS_TICKS`
    /// and `TETRIS_LOG_PATH`
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let seed = env::var("TETRIS_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed);
        let ticks = env::var("TETRIS_TICKS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.ticks);
        let non_empty = |key: &str| {
            env::var(key)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        };

        Self {
            seed,
            ticks,
            config_path: non_empty("TETRIS_CONFIG"),
            log_path: non_empty("TETRIS_LOG_PATH"),
            ..defaults
        }
    }

    /// Apply `--flag value` arguments on top of `self`
    pub fn with_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            if flag == "--no-demo" {
                self.no_demo = true;
                i += 1;
                continue;
            }
            let value = args
                .get(i + 1)
                .ok_or_else(|| anyhow!("missing value for {}", flag))?;
            match flag {
                "--seed" => {
                    self.seed = value
                        .parse()
                        .map_err(|_| anyhow!("invalid --seed value: {}", value))?;
                }
                "--ticks" => {
                    self.ticks = value
                        .parse()
                        .map_err(|_| anyhow!("invalid --ticks value: {}", value))?;
                }
                "--config" => self.config_path = Some(PathBuf::from(value)),
                "--log" => self.log_path = Some(PathBuf::from(value)),
                "--difficulty" => {
                    self.difficulty = Some(
                        Difficulty::from_str(value)
                            .ok_or_else(|| anyhow!("unknown difficulty: {}", value))?,
                    );
                }
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 2;
        }
        Ok(self)
    }

    /// Load the file config (if any), apply the difficulty preset and validate
    pub fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config_path {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(difficulty) = self.difficulty {
            config = config.with_difficulty(difficulty);
        }
        config.demo.auto_start = !self.no_demo;
        config.validate()?;
        Ok(config)
    }
}

/// One line of the JSONL event log
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord<'a> {
    Lock {
        episode: u32,
        tick: u32,
        #[serde(flatten)]
        event: &'a LockEvent,
    },
    GameOver {
        episode: u32,
        tick: u32,
        score: u32,
        lines: u32,
        level: u32,
        pieces: u32,
    },
}

pub struct EventLog {
    out: BufWriter<File>,
    buf: Vec<u8>,
}

impl EventLog {
    pub fn open(path: &PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
            buf: Vec::with_capacity(512),
        })
    }

    pub fn write(&mut self, record: &LogRecord<'_>) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, record)?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub games: u32,
    pub best_score: u32,
    pub total_lines: u32,
    pub pieces: u32,
}

/// Drive a session for `run.ticks` frames
pub fn run_headless(run: &RunConfig) -> Result<RunSummary> {
    let config = run.game_config()?;
    let mut session = Session::try_new(config, run.seed)?;
    let mut log = run.log_path.as_ref().map(EventLog::open).transpose()?;

    let mut summary = RunSummary {
        games: 1,
        ..RunSummary::default()
    };
    let mut was_over = false;

    for tick in 0..run.ticks {
        let episode = session.state().episode_id();
        session.tick(TICK_MS, None);
        let state = session.state_mut();

        if let Some(event) = state.take_last_event() {
            summary.pieces += 1;
            summary.total_lines += event.lines_cleared;
            if event.lines_cleared >= 4 {
                eprintln!(
                    "[Demo] episode {} tick {}: {} lines (+{}, combo {})",
                    episode, tick, event.lines_cleared, event.line_clear_score, event.combo
                );
            }
            if let Some(log) = log.as_mut() {
                log.write(&LogRecord::Lock {
                    episode,
                    tick,
                    event: &event,
                })?;
            }
        }

        let over = state.game_over();
        if over && !was_over {
            summary.best_score = summary.best_score.max(state.score());
            eprintln!(
                "[Demo] episode {} over: score {} lines {} level {}",
                episode,
                state.score(),
                state.lines(),
                state.level()
            );
            if let Some(log) = log.as_mut() {
                log.write(&LogRecord::GameOver {
                    episode,
                    tick,
                    score: state.score(),
                    lines: state.lines(),
                    level: state.level(),
                    pieces: state.pieces_locked(),
                })?;
            }
        }
        if session.state().episode_id() != episode {
            summary.games += 1;
        }
        was_over = over;
    }

    summary.best_score = summary.best_score.max(session.state().score());
    if let Some(log) = log.as_mut() {
        log.flush()?;
    }
    Ok(summary)
}
