use crate::{Error, Rank, Result, Shoe};

use strum::IntoEnumIterator;

use rand::seq::SliceRandom;
use rand::Rng;

/// Represents a shoe in the real world: the cards in dealing order.
#[derive(Debug, Clone)]
pub struct DealingShoe {
    composition: Shoe,
    cut_card_remaining: usize,
    cards: Vec<Rank>,
    current_index: usize,
}

impl DealingShoe {
    /// Creates a new shoe with ordered cards. The cut card is reached once no
    /// more than `cut_card_remaining` cards are left.
    pub fn new(composition: &Shoe, cut_card_remaining: usize) -> DealingShoe {
        let mut cards = Vec::with_capacity(composition.total_remaining() as usize);
        for rank in Rank::iter() {
            for _ in 0..composition.count(rank) {
                cards.push(rank);
            }
        }
        DealingShoe {
            composition: composition.clone(),
            cut_card_remaining,
            cards,
            current_index: 0,
        }
    }

    pub fn with_number_of_decks(number_of_decks: u8, cut_card_remaining: usize) -> DealingShoe {
        Self::new(&Shoe::new(number_of_decks), cut_card_remaining)
    }

    /// Returns the dealt cards back into the shoe and shuffles.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.current_index = 0;
    }

    /// Returns the dealt cards back into the shoe, and shuffles. The given
    /// first few cards will be dealt first, in order. Fails if the shoe does
    /// not hold them.
    pub fn shuffle_with_firsts<R: Rng + ?Sized>(
        &mut self,
        firsts: &[Rank],
        rng: &mut R,
    ) -> Result<()> {
        let mut rest = self.composition.clone();
        for &rank in firsts {
            rest.remove(rank)?;
        }

        self.cards.clear();
        self.cards.extend_from_slice(firsts);
        for (rank, count) in rest.remaining() {
            for _ in 0..count {
                self.cards.push(rank);
            }
        }
        self.cards[firsts.len()..].shuffle(rng);
        self.current_index = 0;
        Ok(())
    }

    /// Deals a card if the shoe is not empty.
    pub fn deal_card(&mut self) -> Result<Rank> {
        let card = *self.cards.get(self.current_index).ok_or(Error::NoCardsLeft)?;
        self.current_index += 1;
        Ok(card)
    }

    /// Checks if the cut card has been reached.
    pub fn reached_cut_card(&self) -> bool {
        self.remaining() <= self.cut_card_remaining
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn number_of_dealt_cards(&self) -> usize {
        self.current_index
    }

    pub fn preview_next_few_cards(&self, number: usize) -> &[Rank] {
        let end = (self.current_index + number).min(self.cards.len());
        &self.cards[self.current_index..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn count_of(shoe: &DealingShoe, rank: Rank) -> usize {
        shoe.cards.iter().filter(|&&card| card == rank).count()
    }

    #[test]
    fn new_shoe_is_ordered() {
        let shoe = DealingShoe::with_number_of_decks(2, 10);
        assert_eq!(shoe.remaining(), 104);
        let preview = shoe.preview_next_few_cards(9);
        assert!(preview[..8].iter().all(|&card| card == Rank::Ace));
        assert_eq!(preview[8], Rank::Two);
        for rank in Rank::iter() {
            assert_eq!(count_of(&shoe, rank), 8);
        }
    }

    #[test]
    fn shuffle_keeps_every_card() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shoe = DealingShoe::with_number_of_decks(1, 0);
        shoe.deal_card().unwrap();
        shoe.shuffle(&mut rng);
        assert_eq!(shoe.remaining(), 52);
        for rank in Rank::iter() {
            assert_eq!(count_of(&shoe, rank), 4);
        }
    }

    #[test]
    fn test_shuffle_with_firsts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shoe = DealingShoe::with_number_of_decks(1, 0);
        let firsts = [Rank::Ace, Rank::Two, Rank::Six, Rank::Six, Rank::Nine];
        shoe.shuffle_with_firsts(&firsts, &mut rng).unwrap();
        for rank in Rank::iter() {
            assert_eq!(count_of(&shoe, rank), 4);
        }
        for &rank in &firsts {
            assert_eq!(shoe.deal_card().unwrap(), rank);
        }
        assert_eq!(shoe.remaining(), 47);
    }

    #[test]
    fn invalid_firsts_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shoe = DealingShoe::with_number_of_decks(1, 0);
        let firsts = [Rank::Six; 5];
        assert_eq!(
            shoe.shuffle_with_firsts(&firsts, &mut rng),
            Err(Error::DepletedRank(Rank::Six))
        );
    }

    #[test]
    fn dealing_past_the_end_fails() {
        let mut shoe = DealingShoe::new(&Shoe::from_ranks(&[Rank::King, Rank::Five]), 1);
        assert!(!shoe.reached_cut_card());
        assert_eq!(shoe.deal_card(), Ok(Rank::Five));
        assert!(shoe.reached_cut_card());
        assert_eq!(shoe.deal_card(), Ok(Rank::King));
        assert_eq!(shoe.deal_card(), Err(Error::NoCardsLeft));
        assert_eq!(shoe.number_of_dealt_cards(), 2);
    }
}
