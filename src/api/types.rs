use serde::{Deserialize, Serialize};

use crate::{
    clues::Clue,
    error::Result,
    grid::Template,
    runner::{FillOutcome, RunStatus},
};

/// A template cell as sent by clients: a boolean or a number, where `true`
/// and any non-zero number mean writable.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellFlag {
    Flag(bool),
    Number(f64),
}

impl CellFlag {
    pub fn is_writable(self) -> bool {
        match self {
            CellFlag::Flag(flag) => flag,
            CellFlag::Number(n) => n != 0.0,
        }
    }
}

/// Request body: the template as nested rows
///
/// ```json
/// [[1, 1, 0], [1, 1, 1], [0, 1, 1]]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TemplateRequest {
    pub rows: Vec<Vec<CellFlag>>,
}

impl TemplateRequest {
    pub fn into_template(self) -> Result<Template> {
        Template::from_rows(
            self.rows
                .into_iter()
                .map(|row| row.into_iter().map(CellFlag::is_writable).collect())
                .collect(),
        )
    }
}

/// Response body of a fill
#[derive(Debug, Clone, Serialize)]
pub struct FillResponse {
    /// True iff every segment was filled before the deadline
    pub completed: bool,
    pub status: RunStatus,
    pub board: Vec<Vec<String>>,
    pub clues: Vec<Clue>,
}

impl FillResponse {
    pub fn new(outcome: &FillOutcome, clues: Vec<Clue>) -> Self {
        Self {
            completed: outcome.completed(),
            status: outcome.status,
            board: outcome.board.to_rows(),
            clues,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
