//! Execution engine: dispatches commands against a shared context.
//!
//! A program runs top to bottom. Every command goes through
//! [`Engine::dispatch`], which matches on the command kind and either mutates
//! the [`Context`], writes a report to the output, calls the audio analyzer,
//! or runs a loop body through `dispatch` again.
//!
//! Failures come in two flavours. Catalog misses and analysis problems are
//! written to the output and execution continues. [`EngineError`]s
//! (unsupported operators, type mismatches, unknown sort keys, missing song
//! files) are returned to the caller and stop the run.

pub mod commands;
pub mod control;
pub mod env;
pub mod error;
pub mod eval;
pub mod value;

pub use env::Environment;
pub use error::EngineError;
pub use eval::{evaluate, evaluate_condition};
pub use value::Value;

use std::io::Write;

use tracing::debug;

use crate::analysis::AudioAnalyzer;
use crate::catalog::Catalog;
use crate::config::DEFAULT_BARS;
use crate::dsl::{Command, Program};

/// Mutable state shared by every command of a run.
#[derive(Debug, Default)]
pub struct Context {
    pub catalog: Catalog,
    pub vars: Environment,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Command dispatcher. Owns the analyzer and the output sink.
pub struct Engine<W: Write> {
    analyzer: Box<dyn AudioAnalyzer>,
    out: W,
    default_bars: u32,
}

impl<W: Write> Engine<W> {
    pub fn new(analyzer: Box<dyn AudioAnalyzer>, out: W) -> Self {
        Self {
            analyzer,
            out,
            default_bars: DEFAULT_BARS,
        }
    }

    pub fn with_default_bars(mut self, bars: u32) -> Self {
        self.default_bars = bars;
        self
    }

    /// Run a whole program.
    pub fn run(&mut self, program: &Program, ctx: &mut Context) -> Result<(), EngineError> {
        debug!(commands = program.len(), "running program");
        self.run_block(&program.commands, ctx)
    }

    /// Dispatch each command in order, stopping at the first hard error.
    pub fn run_block(&mut self, commands: &[Command], ctx: &mut Context) -> Result<(), EngineError> {
        for command in commands {
            self.dispatch(command, ctx)?;
        }
        Ok(())
    }

    /// Execute a single command.
    pub fn dispatch(&mut self, command: &Command, ctx: &mut Context) -> Result<(), EngineError> {
        debug!(command = command.kind_name(), "dispatch");
        match command {
            Command::Song(decl) => self.declare_song(decl, ctx),
            Command::Search { name } => self.search(name, ctx),
            Command::Analyze(cmd) => self.analyze(cmd, ctx),
            Command::OrganizeAll { identifier } => self.organize(None, identifier, ctx),
            Command::OrganizeGenre { genre, identifier } => {
                self.organize(Some(genre.as_str()), identifier, ctx)
            }
            Command::Scratch { name } => self.scratch(name, ctx),
            Command::AddAudio { song, file } => self.add_audio(song, file, ctx),
            Command::Set(assignment) => self.assign(assignment, ctx),
            Command::Shout { expression } => self.shout(expression, ctx),
            Command::If(counted) => self.run_counted(counted, ctx),
            Command::Spin(spin) => self.run_spin(spin, ctx),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub analyzer shared by the engine tests.

    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use crate::analysis::{format_time, AnalysisError, AudioAnalyzer, MixPoints};

    #[derive(Debug, Clone, PartialEq)]
    pub struct MixCall {
        pub path: PathBuf,
        pub bpm: f64,
        pub bars: u32,
    }

    #[derive(Default, Clone)]
    pub struct StubAnalyzer {
        pub bpm_by_file: HashMap<PathBuf, f64>,
        pub missing: Vec<PathBuf>,
        pub too_short: bool,
        pub mix_calls: Rc<RefCell<Vec<MixCall>>>,
        pub detect_calls: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl StubAnalyzer {
        pub fn with_bpm(mut self, file: &str, bpm: f64) -> Self {
            self.bpm_by_file.insert(PathBuf::from(file), bpm);
            self
        }

        pub fn with_missing(mut self, file: &str) -> Self {
            self.missing.push(PathBuf::from(file));
            self
        }
    }

    impl AudioAnalyzer for StubAnalyzer {
        fn detect_bpm(&self, path: &Path) -> f64 {
            self.detect_calls.borrow_mut().push(path.to_path_buf());
            self.bpm_by_file.get(path).copied().unwrap_or(120.0)
        }

        fn find_mix_points(
            &self,
            path: &Path,
            bpm: f64,
            bars: u32,
        ) -> Result<MixPoints, AnalysisError> {
            self.mix_calls.borrow_mut().push(MixCall {
                path: path.to_path_buf(),
                bpm,
                bars,
            });
            if self.too_short {
                return Err(AnalysisError::TooShort);
            }
            Ok(MixPoints {
                segment_index: 2,
                mix_in_time: format_time(30.0),
                mix_out_time: format_time(30.0 + 32.0 * 60.0 / bpm),
            })
        }

        fn audio_exists(&self, path: &Path) -> bool {
            !self.missing.iter().any(|m| m == path)
        }
    }
}
