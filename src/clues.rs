use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{dictionary::Dictionary, segment::Direction, solver::Placement};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub row: usize,
    pub column: usize,
    pub length: usize,
    pub direction: Direction,
    pub word: String,
    pub definitions: Vec<String>,
    pub index: usize,
}

/// Numbers the placed words the way printed crosswords do: by starting cell
/// in reading order, with an across and a down entry that start on the same
/// cell sharing a number.
pub fn assemble_clues(assignment: &[Placement], dictionary: &Dictionary) -> Vec<Clue> {
    let mut placements = assignment.to_vec();
    placements.sort_by_key(|p| (p.segment.row, p.segment.column, p.segment.direction));

    let mut indices: HashMap<(usize, usize), usize> = HashMap::new();
    placements
        .into_iter()
        .map(|Placement { segment, word }| {
            let next = indices.len() + 1;
            let index = *indices.entry(segment.start()).or_insert(next);
            Clue {
                row: segment.row,
                column: segment.column,
                length: segment.length,
                direction: segment.direction,
                word: word.to_string(),
                definitions: dictionary.definitions(&word).to_vec(),
                index,
            }
        })
        .collect()
}
