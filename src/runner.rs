use std::sync::Arc;

use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    config::FillOptions,
    dictionary::Dictionary,
    error::{CrosswordError, Result},
    grid::{Board, Template},
    solver::{Placement, Progress, Solver, SolverError},
};

/// How a fill ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    TimedOut,
    NoSolution,
}

#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub status: RunStatus,
    pub board: Board,
    pub assignment: Vec<Placement>,
}

impl FillOutcome {
    /// True only when every segment was filled before the deadline.
    pub fn completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    fn new(status: RunStatus, progress: Progress) -> Self {
        Self {
            status,
            board: progress.board,
            assignment: progress.assignment,
        }
    }
}

/// Fills `template` on a blocking worker and waits at most `options.deadline`.
///
/// The worker publishes its board after every step. When the deadline passes
/// the caller returns the last published board straight away and the worker
/// stops at its next step boundary.
pub async fn fill(
    template: Template,
    dictionary: Arc<Dictionary>,
    options: &FillOptions,
) -> Result<FillOutcome> {
    let cancel = CancellationToken::new();
    // Also stops the worker if this future is dropped before it finishes.
    let _guard = cancel.clone().drop_guard();

    let latest = Arc::new(Mutex::new(Progress {
        board: Board::empty(template.width(), template.height()),
        assignment: Vec::new(),
    }));

    let worker = {
        let cancel = cancel.clone();
        let latest = Arc::clone(&latest);
        let seed = options.seed;
        tokio::task::spawn_blocking(move || {
            let words = dictionary.words();
            let mut solver = match seed {
                Some(seed) => Solver::new_seed(template, words, seed),
                None => Solver::new(template, words),
            };
            let result = solver.run_with(&cancel, |s| *latest.lock() = s.progress());
            (result, solver.progress())
        })
    };

    match tokio::time::timeout(options.deadline, worker).await {
        Ok(Ok((result, progress))) => {
            let status = match result {
                Ok(()) => RunStatus::Completed,
                Err(SolverError::NoSolution) => RunStatus::NoSolution,
                Err(SolverError::Cancelled) => RunStatus::TimedOut,
            };
            info!(
                "Fill finished: {:?} with {} words",
                status,
                progress.assignment.len()
            );
            Ok(FillOutcome::new(status, progress))
        }
        Ok(Err(e)) => Err(CrosswordError::Worker(e.to_string())),
        Err(_) => {
            cancel.cancel();
            let progress = latest.lock().clone();
            warn!(
                "Fill timed out after {:?} with {} words placed",
                options.deadline,
                progress.assignment.len()
            );
            Ok(FillOutcome::new(RunStatus::TimedOut, progress))
        }
    }
}
