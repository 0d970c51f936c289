pub mod api;
pub mod clues;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod grid;
pub mod logging;
pub mod runner;
pub mod segment;
pub mod solver;
pub mod vocabulary;

pub use api::{create_router, AppState};
pub use clues::{assemble_clues, Clue};
pub use config::{FillOptions, ServerConfig};
pub use dictionary::Dictionary;
pub use error::{CrosswordError, Result};
pub use grid::{Board, Cell, Grid, Template};
pub use runner::{fill, FillOutcome, RunStatus};
pub use segment::{extract_segments, is_segment_start, Direction, Segment};
pub use solver::{Placement, Progress, Solver, SolverError};
pub use vocabulary::{Pattern, Vocabulary};
