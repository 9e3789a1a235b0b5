//! Ordering of candidate columns to front-load the most promising ones

use crate::evaluation::evaluate;
use crate::position::Position;
use crate::search::SearchContext;

/// Returns the columns ordered from the middle outwards, left of centre first,
/// as the middle columns are often better moves
pub fn move_order(width: usize) -> Vec<usize> {
    (0..width)
        .map(|i| (width / 2) + (1 - i % 2) * (i / 2) - (i % 2) * (i / 2 + 1))
        .collect()
}

/// Centrality priority of `column`: the centre column of a `width` board
/// scores `width - 1`, the rightmost edge column scores 0
pub fn column_priority(column: usize, width: usize) -> usize {
    let centre = width / 2;
    // position of `column` in `move_order(width)`
    let rank = if column >= centre {
        2 * (column - centre)
    } else {
        2 * (centre - column) - 1
    };
    width.saturating_sub(rank + 1)
}

/// Candidate columns kept sorted by (score, priority) with insertion sort,
/// iterating from the highest key to the lowest
pub struct MoveSorter {
    // column and its (score, priority) key
    moves: Vec<(usize, (i32, usize))>,
}

impl MoveSorter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: usize, key: (i32, usize)) {
        let mut pos = self.moves.len();
        // equal keys stay in insertion order when popped from the back
        while pos != 0 && self.moves[pos - 1].1 >= key {
            pos -= 1;
        }
        self.moves.insert(pos, (column, key));
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Iterator for MoveSorter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        self.moves.pop().map(|(column, _)| column)
    }
}

/// Orders the legal columns of `position`, best first
///
/// Columns are keyed by the evaluation of the position they lead to (from the
/// maximizing player's view, whoever is to move), then by centrality.
pub fn order_columns<P: Position>(position: &P, context: &SearchContext) -> Vec<usize> {
    let width = position.width();
    let columns = position.possible_columns();

    let mut sorter = MoveSorter::with_capacity(columns.len());
    for column in columns {
        let score = evaluate(&position.successor(column), context);
        sorter.push(column, (score, column_priority(column, width)));
    }
    sorter.collect()
}
