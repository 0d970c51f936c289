use std::fmt::Debug;

use crate::error::{CrosswordError, Result};

/// The immutable shape of a puzzle: which cells can hold a letter.
#[derive(Clone, PartialEq, Eq)]
pub struct Template {
    width: usize,
    height: usize,
    writable: Vec<bool>,
}

impl Template {
    /// Builds a template from rows of writable flags. Fails on zero dimensions
    /// or rows of differing lengths.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if height == 0 || width == 0 {
            return Err(CrosswordError::InvalidTemplate(format!(
                "template must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(CrosswordError::InvalidTemplate(format!(
                "row {} has {} cells, expected {}",
                row,
                cells.len(),
                width
            )));
        }

        Ok(Self {
            width,
            height,
            writable: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True iff the coordinates are in bounds and the cell is writable.
    /// Coordinates are signed so callers can probe one step outside the grid.
    pub fn is_writable(&self, row: isize, column: isize) -> bool {
        self.index(row, column).map_or(false, |idx| self.writable[idx])
    }

    /// Flat cell index for in-bounds coordinates.
    pub fn index(&self, row: isize, column: isize) -> Option<usize> {
        if row < 0 || column < 0 {
            return None;
        }
        let (row, column) = (row as usize, column as usize);
        if row >= self.height || column >= self.width {
            return None;
        }
        Some(row * self.width + column)
    }
}

impl Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.writable.chunks(self.width) {
            let line: String = row.iter().map(|w| if *w { '.' } else { '#' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Content of a single board cell as seen through the grid model.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// The template blocks this cell (or it lies outside the grid).
    Blocked,
    /// Writable, but nothing has been placed yet.
    Empty,
    Letter(char),
}

impl Cell {
    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Letter(c) => Some(c),
            _ => None,
        }
    }
}

/// Placed characters, one slot per template cell.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<char>>,
}

impl Board {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, column: usize) -> Option<char> {
        if row >= self.height || column >= self.width {
            return None;
        }
        self.cells[row * self.width + column]
    }

    /// Rows of single-character strings, empty string for unfilled cells.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|c| c.map(String::from).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.unwrap_or('.')).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// A template together with the board being filled against it.
///
/// The board only ever holds letters in writable cells: writes and clears
/// aimed at blocked or out-of-bounds cells are ignored.
#[derive(Clone, Debug)]
pub struct Grid {
    template: Template,
    board: Board,
}

impl Grid {
    pub fn new(template: Template) -> Self {
        let board = Board::empty(template.width(), template.height());
        Self { template, board }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_writable(&self, row: isize, column: isize) -> bool {
        self.template.is_writable(row, column)
    }

    pub fn read_cell(&self, row: isize, column: isize) -> Cell {
        match self.writable_index(row, column) {
            Some(idx) => self.board.cells[idx].map_or(Cell::Empty, Cell::Letter),
            None => Cell::Blocked,
        }
    }

    /// Returns false when the cell is not writable.
    pub fn write_cell(&mut self, row: isize, column: isize, letter: char) -> bool {
        match self.writable_index(row, column) {
            Some(idx) => {
                self.board.cells[idx] = Some(letter);
                true
            }
            None => false,
        }
    }

    pub fn clear_cell(&mut self, row: isize, column: isize) {
        if let Some(idx) = self.writable_index(row, column) {
            self.board.cells[idx] = None;
        }
    }

    fn writable_index(&self, row: isize, column: isize) -> Option<usize> {
        self.template
            .index(row, column)
            .filter(|idx| self.template.writable[*idx])
    }
}
