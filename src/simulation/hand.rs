use crate::{HandTotal, Rank};

/// The cards of one hand at the table, plus what is wagered on it.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Rank>,
    total: HandTotal,
    bet: u32,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(4),
            ..Default::default()
        }
    }

    pub fn receive_card(&mut self, card: Rank) {
        self.cards.push(card);
        self.total = self.total.add(card);
    }

    /// Doubles the bet. The caller deals the single extra card.
    pub fn double_down(&mut self) {
        self.bet *= 2;
    }

    pub fn set_original_bet(&mut self, bet: u32) {
        self.bet = bet;
    }

    pub fn get_bet(&self) -> u32 {
        self.bet
    }

    pub fn get_cards(&self) -> &[Rank] {
        &self.cards
    }

    pub fn total(&self) -> HandTotal {
        self.total
    }

    pub fn bust(&self) -> bool {
        self.total.bust()
    }

    /// Two cards worth 21.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.total.total == 21
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.total = HandTotal::default();
        self.bet = 0;
    }
}
