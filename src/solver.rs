use log::{debug, info, warn};
use nanorand::WyRand;
use thiserror::Error;
use tinyset::SetUsize;
use tokio_util::sync::CancellationToken;
use ustr::Ustr;

use crate::{
    grid::{Board, Cell, Grid, Template},
    segment::{extract_segments, Crossings, Segment},
    vocabulary::{Pattern, Vocabulary},
};

/// Failures after which a fill can run no further.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    /// The first segment has no candidate and nothing is left to undo.
    #[error("no solution found with current vocabulary ordering")]
    NoSolution,
    #[error("search cancelled before completion")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    SelectWord,
    BackTracking,
    Solved,
    NoSolution(SolverError),
}

/// A word accepted into a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub segment: Segment,
    pub word: Ustr,
}

/// The board and assignment as of a step boundary.
#[derive(Debug, Clone)]
pub struct Progress {
    pub board: Board,
    pub assignment: Vec<Placement>,
}

/// Fills segments strictly in extraction order. The accepted stack always
/// holds one placement per segment position below the cursor, so the cursor
/// is the stack height.
pub struct Solver {
    grid: Grid,
    segments: Vec<Segment>,
    crossings: Crossings,
    vocabulary: Vocabulary,
    accepted: Vec<Placement>,
    placed: SetUsize, // segment positions whose word is on the board
    reverts: Vec<u8>,
    state: State,
}

impl Solver {
    pub fn new(template: Template, words: impl IntoIterator<Item = Ustr>) -> Self {
        Self::with_rng(template, words, WyRand::new())
    }

    pub fn new_seed(
        template: Template,
        words: impl IntoIterator<Item = Ustr>,
        seed: u64,
    ) -> Self {
        Self::with_rng(template, words, WyRand::new_seed(seed))
    }

    fn with_rng(template: Template, words: impl IntoIterator<Item = Ustr>, rng: WyRand) -> Self {
        let segments = extract_segments(&template);
        let crossings = Crossings::new(&template, &segments);
        let vocabulary = Vocabulary::new(words, segments.iter().map(|s| s.length), rng);

        debug!(
            "{} segments, {} candidate words",
            segments.len(),
            vocabulary.len()
        );

        Self {
            grid: Grid::new(template),
            reverts: vec![0; segments.len()],
            accepted: Vec::with_capacity(segments.len()),
            placed: SetUsize::new(),
            state: if segments.is_empty() {
                State::Solved
            } else {
                State::SelectWord
            },
            segments,
            crossings,
            vocabulary,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Position of the next segment to fill.
    pub fn cursor(&self) -> usize {
        self.accepted.len()
    }

    pub fn assignment(&self) -> &[Placement] {
        &self.accepted
    }

    pub fn reverts(&self) -> &[u8] {
        &self.reverts
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn progress(&self) -> Progress {
        Progress {
            board: self.grid.board().clone(),
            assignment: self.accepted.clone(),
        }
    }

    /// Runs until solved, stuck, or cancelled.
    pub fn run(&mut self, cancel: &CancellationToken) -> Result<(), SolverError> {
        self.run_with(cancel, |_| {})
    }

    /// Like [`Solver::run`], calling `on_step` after every step. The token is
    /// only polled between steps, so a placement is never interrupted.
    pub fn run_with<F>(
        &mut self,
        cancel: &CancellationToken,
        mut on_step: F,
    ) -> Result<(), SolverError>
    where
        F: FnMut(&Self),
    {
        loop {
            match self.state {
                State::Solved => return Ok(()),
                State::NoSolution(e) => return Err(e),
                State::SelectWord | State::BackTracking => {}
            }
            if cancel.is_cancelled() {
                info!(
                    "Search cancelled with {}/{} segments filled",
                    self.accepted.len(),
                    self.segments.len()
                );
                return Err(SolverError::Cancelled);
            }
            self.step();
            on_step(self);
        }
    }

    /// Performs a single step: either tries to fill the segment at the
    /// cursor or undoes earlier placements after a failure.
    pub fn step(&mut self) -> State {
        self.state = match self.state {
            State::SelectWord => self.select_word(),
            State::BackTracking => self.backtrack(),
            done => done,
        };
        self.state
    }

    fn select_word(&mut self) -> State {
        let position = self.accepted.len();
        let segment = match self.segments.get(position) {
            Some(segment) => *segment,
            None => return State::Solved,
        };

        self.vocabulary.shuffle(segment.length);

        let pattern = Pattern::from_cells(
            segment
                .cells()
                .map(|(row, column)| self.grid.read_cell(row, column)),
        );

        let grid = &mut self.grid;
        let chosen = self
            .vocabulary
            .matching_words(&pattern)
            .find(|word| place_word(grid, segment, word));

        match chosen {
            Some(word) => {
                debug!("Segment {} {:?}: {}", position, segment, word);
                self.accept(position, word);
                if self.accepted.len() == self.segments.len() {
                    info!("Filled all {} segments", self.segments.len());
                    State::Solved
                } else {
                    State::SelectWord
                }
            }
            None => {
                debug!("No candidate for segment {} {:?}", position, segment);
                State::BackTracking
            }
        }
    }

    fn accept(&mut self, position: usize, word: Ustr) {
        self.accepted.push(Placement {
            segment: self.segments[position],
            word,
        });
        self.placed.insert(position);
    }

    /// Undoes the most recent placement. A position undone for the second
    /// time in a row resets its counter and also undoes the one before it,
    /// so two segments cannot keep trading the same cells forever.
    fn backtrack(&mut self) -> State {
        if self.accepted.is_empty() {
            warn!("First segment has no candidate word; giving up");
            return State::NoSolution(SolverError::NoSolution);
        }

        let failed_at = self.accepted.len();
        while let Some(undone) = self.accepted.pop() {
            let position = self.accepted.len();
            self.remove_word(position);
            debug!("Undid segment {}: {}", position, undone.word);

            self.reverts[position] += 1;
            if self.reverts[position] < 2 {
                break;
            }
            self.reverts[position] = 0;
        }

        debug!(
            "Backtracked from segment {} to {}",
            failed_at,
            self.accepted.len()
        );
        State::SelectWord
    }

    /// Clears the segment's cells, except those a placed crossing segment
    /// still holds a letter in.
    fn remove_word(&mut self, position: usize) {
        let segment = self.segments[position];
        let across = segment.direction.other();

        for (row, column) in segment.cells() {
            let held = self
                .grid
                .template()
                .index(row, column)
                .and_then(|cell| self.crossings.through(cell, across))
                .map_or(false, |crossing| self.placed.contains(crossing));
            if !held {
                self.grid.clear_cell(row, column);
            }
        }

        self.placed.remove(position);
    }
}

/// Writes `word` into `segment` if every cell is empty or already holds the
/// matching letter. Leaves the board untouched otherwise.
fn place_word(grid: &mut Grid, segment: Segment, word: &str) -> bool {
    if word.chars().count() != segment.length {
        return false;
    }

    let fits = segment
        .cells()
        .zip(word.chars())
        .all(|((row, column), c)| match grid.read_cell(row, column) {
            Cell::Empty => true,
            Cell::Letter(existing) => existing == c,
            Cell::Blocked => false,
        });
    if !fits {
        return false;
    }

    for ((row, column), c) in segment.cells().zip(word.chars()) {
        grid.write_cell(row, column, c);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(rows: &[&str]) -> Template {
        Template::from_rows(
            rows.iter()
                .map(|r| r.chars().map(|c| c == '.').collect())
                .collect(),
        )
        .unwrap()
    }

    fn words(words: &[&str]) -> Vec<Ustr> {
        words.iter().map(|w| Ustr::from(*w)).collect()
    }

    fn rows(board: &Board) -> Vec<String> {
        board.to_rows().into_iter().map(|r| r.concat()).collect()
    }

    fn read(grid: &Grid, segment: Segment) -> String {
        segment
            .cells()
            .filter_map(|(r, c)| grid.read_cell(r, c).letter())
            .collect()
    }

    /// Every placement is spelled out on the board and every letter on the
    /// board belongs to some placement.
    fn assert_consistent(solver: &Solver) {
        let grid = solver.grid();
        for (position, placement) in solver.assignment().iter().enumerate() {
            assert_eq!(placement.segment, solver.segments()[position]);
            assert_eq!(read(grid, placement.segment), placement.word.as_str());
        }
        let board = grid.board();
        for row in 0..board.height() {
            for column in 0..board.width() {
                if board.get(row, column).is_none() {
                    continue;
                }
                let covered = solver.assignment().iter().any(|p| {
                    p.segment
                        .cells()
                        .any(|cell| cell == (row as isize, column as isize))
                });
                assert!(covered, "stray letter at ({}, {})", row, column);
            }
        }
    }

    #[test]
    fn fills_single_row() {
        let mut solver = Solver::new_seed(template(&["..."]), words(&["cat", "at"]), 1);
        assert_eq!(solver.run(&CancellationToken::new()), Ok(()));
        assert_eq!(rows(solver.grid().board()), vec!["cat"]);
        assert_eq!(solver.assignment().len(), 1);
        assert_eq!(solver.state(), State::Solved);
    }

    #[test]
    fn fills_two_by_two() {
        for seed in 0..20 {
            let mut solver =
                Solver::new_seed(template(&["..", ".."]), words(&["ab", "ba"]), seed);
            assert_eq!(solver.run(&CancellationToken::new()), Ok(()));
            assert_consistent(&solver);
            assert_eq!(solver.assignment().len(), 4);
            let board = rows(solver.grid().board());
            assert!(board == ["ab", "ba"] || board == ["ba", "ab"], "{:?}", board);
        }
    }

    #[test]
    fn fills_word_square() {
        let mut solver = Solver::new_seed(
            template(&["...", "...", "..."]),
            words(&["bat", "ace", "tee", "cab"]),
            42,
        );
        assert_eq!(solver.run(&CancellationToken::new()), Ok(()));
        assert_consistent(&solver);
        assert_eq!(solver.assignment().len(), 6);
    }

    #[test]
    fn template_without_segments_is_solved() {
        let mut solver = Solver::new(template(&[".#", "#."]), words(&["ab"]));
        assert!(solver.segments().is_empty());
        assert_eq!(solver.run(&CancellationToken::new()), Ok(()));
    }

    #[test]
    fn first_segment_without_candidates_is_terminal() {
        let mut solver = Solver::new_seed(template(&["..."]), words(&["ab", "abcd"]), 3);
        assert_eq!(
            solver.run(&CancellationToken::new()),
            Err(SolverError::NoSolution)
        );
        assert_eq!(solver.cursor(), 0);
        assert_eq!(rows(solver.grid().board()), vec![""]);
        assert_eq!(solver.step(), State::NoSolution(SolverError::NoSolution));
    }

    #[test]
    fn cancelled_before_first_step() {
        let token = CancellationToken::new();
        token.cancel();
        let mut solver = Solver::new(template(&["..."]), words(&["cat"]));
        assert_eq!(solver.run(&token), Err(SolverError::Cancelled));
        assert_eq!(solver.cursor(), 0);
        assert_eq!(rows(solver.grid().board()), vec![""]);
    }

    #[test]
    fn repeated_failure_widens_backtrack() {
        // No word starts with the second letter of another, so the first
        // vertical segment can never be filled.
        let mut solver = Solver::new_seed(template(&["..", ".."]), words(&["ab", "cd"]), 9);

        assert_eq!(solver.step(), State::SelectWord);
        assert_eq!(solver.step(), State::SelectWord);
        assert_eq!(solver.cursor(), 2);
        assert_eq!(solver.step(), State::BackTracking);
        assert_eq!(solver.cursor(), 2);

        assert_eq!(solver.step(), State::SelectWord);
        assert_eq!(solver.cursor(), 1);
        assert_eq!(solver.reverts(), &[0, 1, 0, 0]);

        assert_eq!(solver.step(), State::SelectWord);
        assert_eq!(solver.step(), State::BackTracking);
        assert_eq!(solver.step(), State::SelectWord);
        assert_eq!(solver.cursor(), 0);
        assert_eq!(solver.reverts(), &[1, 0, 0, 0]);
        assert_eq!(rows(solver.grid().board()), vec!["", ""]);
    }

    #[test]
    fn unsolvable_search_stays_consistent() {
        let mut solver = Solver::new_seed(
            template(&["...", "...", "..."]),
            words(&["abc", "def"]),
            5,
        );
        for _ in 0..2_000 {
            let state = solver.step();
            assert!(matches!(state, State::SelectWord | State::BackTracking));
            assert!(solver.reverts().iter().all(|r| *r < 2));
            assert_consistent(&solver);
        }
    }

    #[test]
    fn rejected_placement_leaves_board_untouched() {
        let mut solver = Solver::new(template(&["..", ".."]), words(&["ab"]));
        let across = solver.segments()[0];
        let down = solver.segments()[3];
        assert!(place_word(&mut solver.grid, across, "ab"));

        let before = solver.grid().board().clone();
        assert!(!place_word(&mut solver.grid, down, "xy"));
        assert!(!place_word(&mut solver.grid, down, "bcd"));
        assert_eq!(solver.grid().board(), &before);

        assert!(place_word(&mut solver.grid, down, "bz"));
        assert_eq!(rows(solver.grid().board()), vec!["ab", "z"]);
    }

    #[test]
    fn removal_keeps_letters_of_placed_crossings() {
        let mut solver = Solver::new(template(&["..", ".."]), words(&["ab"]));
        let across = solver.segments()[0];
        let down = solver.segments()[2];

        assert!(place_word(&mut solver.grid, across, "ab"));
        solver.accept(0, Ustr::from("ab"));
        assert!(place_word(&mut solver.grid, down, "ac"));
        solver.placed.insert(2);

        solver.remove_word(0);
        assert_eq!(solver.grid().read_cell(0, 0), Cell::Letter('a'));
        assert_eq!(solver.grid().read_cell(0, 1), Cell::Empty);
        assert_eq!(solver.grid().read_cell(1, 0), Cell::Letter('c'));

        solver.remove_word(2);
        assert_eq!(rows(solver.grid().board()), vec!["", ""]);
    }

    #[test]
    fn run_with_reports_every_step() {
        let mut steps = 0;
        let mut solver = Solver::new_seed(template(&["..", ".."]), words(&["ab", "ba"]), 11);
        solver
            .run_with(&CancellationToken::new(), |s| {
                steps += 1;
                assert!(s.cursor() <= s.segments().len());
            })
            .unwrap();
        assert!(steps >= 4);
    }
}
