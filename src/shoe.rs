use crate::{Error, Rank, Result, NUMBER_OF_RANKS};
use strum::IntoEnumIterator;

/// The undealt cards of a shoe, tracked by rank only.
///
/// A `Shoe` is a plain array of counts, so cloning it is how the engine
/// branches into hypothetical futures without touching the caller's copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shoe {
    counts: [u16; NUMBER_OF_RANKS],
    full: [u16; NUMBER_OF_RANKS],
}

impl Shoe {
    /// Creates a full shoe of `number_of_decks` 52-card decks.
    pub fn new(number_of_decks: u8) -> Shoe {
        let counts = [number_of_decks as u16 * 4; NUMBER_OF_RANKS];
        Shoe {
            counts,
            full: counts,
        }
    }

    /// Creates a shoe with an arbitrary composition, indexed by [`Rank::index`].
    /// The given counts are also the ceiling for [`Shoe::restore`].
    pub fn from_counts(counts: [u16; NUMBER_OF_RANKS]) -> Shoe {
        Shoe {
            counts,
            full: counts,
        }
    }

    /// Creates a shoe holding exactly the given cards.
    pub fn from_ranks(ranks: &[Rank]) -> Shoe {
        let mut counts = [0; NUMBER_OF_RANKS];
        for rank in ranks {
            counts[rank.index()] += 1;
        }
        Self::from_counts(counts)
    }

    /// Removes a card of the given rank, e.g. because it was dealt and seen.
    pub fn remove(&mut self, rank: Rank) -> Result<()> {
        let count = &mut self.counts[rank.index()];
        if *count == 0 {
            return Err(Error::DepletedRank(rank));
        }
        *count -= 1;
        Ok(())
    }

    /// Puts a card of the given rank back. Fails if the rank is already at the
    /// count the shoe started with.
    pub fn restore(&mut self, rank: Rank) -> Result<()> {
        let i = rank.index();
        if self.counts[i] >= self.full[i] {
            return Err(Error::OverfullRank(rank));
        }
        self.counts[i] += 1;
        Ok(())
    }

    /// Returns every dealt card to the shoe.
    pub fn reset(&mut self) {
        self.counts = self.full;
    }

    pub fn count(&self, rank: Rank) -> u16 {
        self.counts[rank.index()]
    }

    /// Number of cards left in the shoe.
    pub fn total_remaining(&self) -> u16 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Probability that the next card dealt has the given rank. Zero for an
    /// empty shoe.
    pub fn proportion(&self, rank: Rank) -> f64 {
        let total = self.total_remaining();
        if total == 0 {
            return 0.0;
        }
        self.count(rank) as f64 / total as f64
    }

    /// Counts per blackjack value, index 0 for Ace through index 9 for all
    /// ten-valued ranks together.
    pub fn value_counts(&self) -> [u16; 10] {
        let mut ret = [0; 10];
        for rank in Rank::iter() {
            ret[(rank.blackjack_value() - 1) as usize] += self.counts[rank.index()];
        }
        ret
    }

    /// Ranks still present together with their counts, in rank order.
    pub fn remaining(&self) -> impl Iterator<Item = (Rank, u16)> + '_ {
        Rank::iter()
            .map(move |rank| (rank, self.counts[rank.index()]))
            .filter(|&(_, count)| count > 0)
    }

    /// Returns a copy of this shoe with one card of `rank` taken out. The rank
    /// must be present.
    pub(crate) fn without(&self, rank: Rank) -> Shoe {
        let mut next = self.clone();
        next.counts[rank.index()] -= 1;
        next
    }
}
