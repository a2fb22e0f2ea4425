use crate::{DealerTotal, HandTotal, Shoe};
use std::collections::HashMap;

/// Everything an expectation sub-calculation depends on. Two equal frames
/// always have the same expectation.
///
/// The shoe is keyed by counts per blackjack value rather than per rank: the
/// ten-valued ranks are interchangeable for every total, so collapsing them
/// lets sibling branches share results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    shoe: [u16; 10],
    dealer: DealerTotal,
    player: HandTotal,
    doubled: bool,
    depth: u8,
}

impl Frame {
    pub fn new(shoe: &Shoe, dealer: DealerTotal, player: HandTotal, doubled: bool) -> Self {
        Self {
            shoe: shoe.value_counts(),
            dealer,
            player,
            doubled,
            depth: 0,
        }
    }

    /// Distinguishes frames reached after different numbers of player draws,
    /// for searches that cap how many cards the player may take.
    pub fn at_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }
}

/// Solved expectations keyed by [`Frame`].
#[derive(Debug, Default, Clone)]
pub struct FrameTable<T> {
    data: HashMap<Frame, T>,
}

impl<T> FrameTable<T> {
    pub fn new() -> FrameTable<T> {
        FrameTable {
            data: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn get(&self, index: &Frame) -> Option<&T> {
        self.data.get(index)
    }

    pub fn insert(&mut self, index: Frame, value: T) {
        self.data.insert(index, value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
