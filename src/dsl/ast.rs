//! Command tree for djset programs.
//!
//! A program is an ordered list of [`Command`]s. The tree is produced once by
//! a front-end (or loaded from YAML, see [`super::Program`]) and is immutable
//! afterwards; the engine only reads it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A complete program: the top-level command sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    pub commands: Vec<Command>,
}

/// One instruction of a DJ set.
///
/// Serialized as a YAML-tagged value, e.g. `!Search { name: Strobe }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Declare a song and add it to the catalog.
    Song(SongDecl),
    /// Print the details of a song.
    Search { name: String },
    /// Suggest mix-in/mix-out points for a song or a file.
    Analyze(AnalyzeCmd),
    /// List every song sorted by an identifier.
    OrganizeAll { identifier: String },
    /// List the songs of one genre sorted by an identifier.
    OrganizeGenre { genre: String, identifier: String },
    /// Remove a song and bar its name from future searches.
    Scratch { name: String },
    /// Point a song at a different audio file.
    AddAudio { song: String, file: PathBuf },
    /// Bind a variable.
    Set(Assignment),
    /// Print the value of an expression.
    Shout { expression: Expr },
    /// Counted loop. The surface keyword is `if` but it behaves like a
    /// classic `for`: init once, test, body, step.
    If(CountedLoop),
    /// Conditional loop: test, body, repeat.
    Spin(SpinLoop),
}

impl Command {
    /// Short name used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Command::Song(_) => "Song",
            Command::Search { .. } => "Search",
            Command::Analyze(_) => "Analyze",
            Command::OrganizeAll { .. } => "OrganizeAll",
            Command::OrganizeGenre { .. } => "OrganizeGenre",
            Command::Scratch { .. } => "Scratch",
            Command::AddAudio { .. } => "AddAudio",
            Command::Set(_) => "Set",
            Command::Shout { .. } => "Shout",
            Command::If(_) => "If",
            Command::Spin(_) => "Spin",
        }
    }
}

/// A song declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongDecl {
    pub name: String,
    pub artist: String,
    #[serde(alias = "category")]
    pub genre: String,
    pub file: PathBuf,
    /// Camelot key, e.g. `8A`. Defaults to `Unknown` when omitted.
    #[serde(default)]
    pub key: Option<String>,
}

/// Mix-point analysis request.
///
/// Exactly one of `song` or `file` is expected; `song` wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeCmd {
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub bpm: Option<f64>,
    /// Segment length in bars. Falls back to the configured default.
    #[serde(default)]
    pub bars: Option<u32>,
}

/// `name = expression`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub expression: Expr,
}

/// `if` loop: init, condition, iteration, body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountedLoop {
    pub init: Assignment,
    pub condition: Condition,
    pub iteration: Assignment,
    #[serde(default)]
    pub body: Vec<Command>,
}

/// `spin` loop: condition and body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinLoop {
    pub condition: Condition,
    #[serde(default)]
    pub body: Vec<Command>,
}

/// Binary comparison. `op` is one of `< > <= >= == !=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub left: Expr,
    pub op: String,
    pub right: Expr,
}

/// Expression node.
///
/// Untagged in YAML: scalars are literals, strings are text, sequences are
/// lists and `{left, op, right}` mappings are binary operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Variable reference or string literal. Resolved against the
    /// environment; an unbound name evaluates to the text itself.
    Text(String),
    List(Vec<Expr>),
    Binary(Box<BinaryExpr>),
}

/// `left op right` where `op` is one of `+ - * /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: String,
    pub right: Expr,
}

impl Expr {
    pub fn text(s: impl Into<String>) -> Self {
        Expr::Text(s.into())
    }

    pub fn binary(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Expr::Binary(Box::new(BinaryExpr {
            left,
            op: op.into(),
            right,
        }))
    }
}

impl Assignment {
    pub fn new(name: impl Into<String>, expression: Expr) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }
}

impl Condition {
    pub fn new(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Self {
            left,
            op: op.into(),
            right,
        }
    }
}
