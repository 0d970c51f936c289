use std::collections::BTreeSet;

use nanorand::{Rng, WyRand};
use ustr::Ustr;
use vec_map::VecMap;

use crate::grid::Cell;

/// Per-cell constraint for a segment: `Some(c)` requires `c`, `None` allows anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern(Vec<Option<char>>);

impl Pattern {
    pub fn any(length: usize) -> Self {
        Self(vec![None; length])
    }

    /// Builds a pattern from board cells; letters become fixed slots.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self(cells.into_iter().map(Cell::letter).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assumes `word` already has the pattern's length.
    fn admits(&self, word: &str) -> bool {
        word.chars()
            .zip(self.0.iter())
            .all(|(c, slot)| slot.map_or(true, |fixed| fixed == c))
    }
}

impl From<&str> for Pattern {
    /// `?` marks an open slot.
    fn from(s: &str) -> Self {
        Self(s.chars().map(|c| Some(c).filter(|c| *c != '?')).collect())
    }
}

/// The candidate words of one run, bucketed by length. Bucket order is the
/// search order and is reshuffled between steps.
pub struct Vocabulary {
    by_length: VecMap<Vec<Ustr>>,
    rng: WyRand,
}

impl Vocabulary {
    /// Keeps only the words whose length is one of `lengths`.
    pub fn new(
        words: impl IntoIterator<Item = Ustr>,
        lengths: impl IntoIterator<Item = usize>,
        rng: WyRand,
    ) -> Self {
        let wanted: BTreeSet<usize> = lengths.into_iter().collect();
        let mut by_length: VecMap<Vec<Ustr>> = VecMap::new();

        for word in words {
            let length = word.chars().count();
            if wanted.contains(&length) {
                by_length.entry(length).or_insert_with(Vec::new).push(word);
            }
        }

        Self { by_length, rng }
    }

    pub fn len(&self) -> usize {
        self.by_length.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        self.by_length
            .get(word.chars().count())
            .map_or(false, |bucket| bucket.iter().any(|w| w.as_str() == word))
    }

    /// Uniformly reorders the words of the given length. Matching only ever
    /// draws from a single length bucket, so this is equivalent to shuffling
    /// the whole vocabulary.
    pub fn shuffle(&mut self, length: usize) {
        if let Some(bucket) = self.by_length.get_mut(length) {
            self.rng.shuffle(bucket);
        }
    }

    /// Lazily yields the words matching `pattern` in current vocabulary order.
    /// Each call starts a fresh scan.
    pub fn matching_words<'v>(
        &'v self,
        pattern: &'v Pattern,
    ) -> impl Iterator<Item = Ustr> + 'v {
        self.by_length
            .get(pattern.len())
            .into_iter()
            .flatten()
            .copied()
            .filter(move |word| pattern.admits(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(words: &[&str], lengths: &[usize]) -> Vocabulary {
        Vocabulary::new(
            words.iter().map(|w| Ustr::from(*w)),
            lengths.iter().copied(),
            WyRand::new_seed(7),
        )
    }

    #[test]
    fn keeps_only_requested_lengths() {
        let v = vocabulary(&["at", "cat", "cart", "dog"], &[3]);
        assert_eq!(v.len(), 2);
        assert!(v.contains("cat"));
        assert!(v.contains("dog"));
        assert!(!v.contains("at"));
    }

    #[test]
    fn matches_fixed_and_open_slots() {
        let v = vocabulary(&["cat", "cot", "cut", "dog", "coat"], &[3, 4]);
        let pattern = Pattern::from("c?t");
        let mut found: Vec<_> = v.matching_words(&pattern).map(|w| w.to_string()).collect();
        found.sort();
        assert_eq!(found, vec!["cat", "cot", "cut"]);

        let pattern = Pattern::from("?o?");
        let mut found: Vec<_> = v.matching_words(&pattern).map(|w| w.to_string()).collect();
        found.sort();
        assert_eq!(found, vec!["cot", "dog"]);

        assert_eq!(v.matching_words(&Pattern::any(4)).count(), 1);
        assert_eq!(v.matching_words(&Pattern::any(5)).count(), 0);
    }

    #[test]
    fn pattern_from_cells() {
        let pattern = Pattern::from_cells([Cell::Letter('a'), Cell::Empty, Cell::Letter('c')]);
        assert_eq!(pattern, Pattern::from("a?c"));
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn matching_restarts_after_shuffle() {
        let words: Vec<String> = (0..50).map(|i| format!("w{:02}", i)).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut v = vocabulary(&refs, &[3]);
        let pattern = Pattern::any(3);

        let before: Vec<String> = v.matching_words(&pattern).map(|w| w.to_string()).collect();
        v.shuffle(3);
        let after: Vec<String> = v.matching_words(&pattern).map(|w| w.to_string()).collect();

        assert_eq!(before.len(), 50);
        assert_eq!(after.len(), 50);
        assert_ne!(before, after);

        let mut sorted_before = before.clone();
        let mut sorted_after = after.clone();
        sorted_before.sort();
        sorted_after.sort();
        assert_eq!(sorted_before, sorted_after);
    }
}
