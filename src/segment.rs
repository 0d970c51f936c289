use serde::{Deserialize, Serialize};
use vec_map::VecMap;

use crate::grid::Template;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    /// Unit step as (delta row, delta column).
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        }
    }

    pub fn other(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// A maximal run of writable cells, the unit a single word is placed into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub row: usize,
    pub column: usize,
    pub length: usize,
    pub direction: Direction,
}

impl Segment {
    // Iterates over the (row, column) of each cell of this segment
    pub fn cells(self) -> SegmentIterator {
        SegmentIterator::new(self)
    }

    pub fn start(&self) -> (usize, usize) {
        (self.row, self.column)
    }
}

pub struct SegmentIterator {
    segment: Segment,
    current: usize,
}

impl SegmentIterator {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            current: 0,
        }
    }
}

impl Iterator for SegmentIterator {
    type Item = (isize, isize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.segment.length {
            return None;
        }
        let (d_row, d_column) = self.segment.direction.step();
        let offset = self.current as isize;
        self.current += 1;
        Some((
            self.segment.row as isize + d_row * offset,
            self.segment.column as isize + d_column * offset,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segment.length - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SegmentIterator {}

/// A cell starts a segment in `direction` when it is writable and the cell
/// one step back is not (blocked or outside the grid).
pub fn is_segment_start(
    template: &Template,
    row: isize,
    column: isize,
    direction: Direction,
) -> bool {
    let (d_row, d_column) = direction.step();
    template.is_writable(row, column) && !template.is_writable(row - d_row, column - d_column)
}

/// Extracts every fillable segment: horizontal ones first, then vertical,
/// each in row-major order of their starting cell. Runs shorter than two
/// cells are not segments.
pub fn extract_segments(template: &Template) -> Vec<Segment> {
    let mut segments = Vec::new();

    for direction in Direction::ALL {
        let (d_row, d_column) = direction.step();
        for row in 0..template.height() as isize {
            for column in 0..template.width() as isize {
                if !is_segment_start(template, row, column, direction) {
                    continue;
                }

                let (mut next_row, mut next_column, mut length) = (row, column, 0);
                while template.is_writable(next_row, next_column) {
                    length += 1;
                    next_row += d_row;
                    next_column += d_column;
                }

                if length < 2 {
                    continue;
                }

                segments.push(Segment {
                    row: row as usize,
                    column: column as usize,
                    length,
                    direction,
                });
            }
        }
    }

    segments
}

/// Maps each cell to the positions (in segment order) of the horizontal and
/// vertical segments passing through it.
pub struct Crossings {
    by_cell: VecMap<(Option<usize>, Option<usize>)>,
}

impl Crossings {
    pub fn new(template: &Template, segments: &[Segment]) -> Self {
        let mut by_cell: VecMap<(Option<usize>, Option<usize>)> = VecMap::new();
        for (position, segment) in segments.iter().enumerate() {
            for (row, column) in segment.cells() {
                let cell = match template.index(row, column) {
                    Some(cell) => cell,
                    None => continue,
                };
                let entry = by_cell.entry(cell).or_insert((None, None));
                match segment.direction {
                    Direction::Horizontal => entry.0 = Some(position),
                    Direction::Vertical => entry.1 = Some(position),
                }
            }
        }
        Self { by_cell }
    }

    /// Position of the segment running in `direction` through cell `cell`.
    pub fn through(&self, cell: usize, direction: Direction) -> Option<usize> {
        self.by_cell.get(cell).and_then(|(horizontal, vertical)| match direction {
            Direction::Horizontal => *horizontal,
            Direction::Vertical => *vertical,
        })
    }
}
