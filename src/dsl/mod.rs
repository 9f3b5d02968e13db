//! Program documents: the typed command tree consumed by the engine.
//!
//! Grammar parsing happens elsewhere; this module only loads a command tree
//! that has already been materialized, written as YAML with one tag per
//! command kind.

pub mod ast;
pub mod error;

pub use ast::*;
pub use error::ProgramError;

use std::path::Path;

impl Program {
    /// Build a program from a command list.
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Deserialize a program from YAML text.
    pub fn from_yaml(source: &str) -> Result<Self, ProgramError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Load a program from disk.
    ///
    /// Relative song and audio paths are rebased onto the directory holding
    /// the program file so a set can be run from any working directory.
    pub fn load(path: &Path) -> Result<Self, ProgramError> {
        let source = std::fs::read_to_string(path).map_err(|source| ProgramError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut program = Self::from_yaml(&source)?;
        if let Some(base) = path.parent() {
            rebase_paths(&mut program.commands, base);
        }
        Ok(program)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn rebase_paths(commands: &mut [Command], base: &Path) {
    for command in commands {
        match command {
            Command::Song(decl) => rebase(&mut decl.file, base),
            Command::AddAudio { file, .. } => rebase(file, base),
            Command::Analyze(cmd) => {
                if let Some(file) = cmd.file.as_mut() {
                    rebase(file, base);
                }
            }
            Command::If(l) => rebase_paths(&mut l.body, base),
            Command::Spin(l) => rebase_paths(&mut l.body, base),
            Command::Search { .. }
            | Command::OrganizeAll { .. }
            | Command::OrganizeGenre { .. }
            | Command::Scratch { .. }
            | Command::Set(_)
            | Command::Shout { .. } => {}
        }
    }
}

fn rebase(path: &mut std::path::PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}
