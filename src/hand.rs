use crate::Rank;

/// A point total plus whether exactly one Ace in it still counts as 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HandTotal {
    pub total: u8,
    pub soft: bool,
}

impl HandTotal {
    pub fn new(total: u8, soft: bool) -> Self {
        Self { total, soft }
    }

    /// Adds a card. An Ace counts 11 unless that busts the hand, and a soft
    /// total that goes over 21 drops its Ace to 1. Only one Ace is ever soft.
    /// A bust total stays as it is.
    pub fn add(self, rank: Rank) -> Self {
        if self.bust() {
            return self;
        }
        let mut total = self.total + rank.value();
        let mut soft = self.soft;
        if rank == Rank::Ace {
            if total > 21 {
                total -= 10;
            } else {
                soft = true;
            }
        }
        if total > 21 && soft {
            total -= 10;
            soft = false;
        }
        Self { total, soft }
    }

    pub fn bust(&self) -> bool {
        self.total > 21
    }
}

/// Folds a hand left to right into its total.
pub fn evaluate_hand(cards: &[Rank]) -> HandTotal {
    cards
        .iter()
        .fold(HandTotal::default(), |hand, &rank| hand.add(rank))
}

/// The dealer's running total during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DealerTotal {
    pub total: u8,
    pub soft: bool,
    /// True only while the next card could complete a two-card 21.
    pub can_blackjack: bool,
}

impl DealerTotal {
    /// The dealer's state when only the up card is showing.
    pub fn from_up_card(up_card: Rank) -> Self {
        let total = up_card.value();
        Self {
            total,
            soft: total == 11,
            can_blackjack: total >= 10,
        }
    }

    pub fn hand(&self) -> HandTotal {
        HandTotal::new(self.total, self.soft)
    }

    /// The dealer draws a card. Blackjack is only possible on the first draw.
    pub fn add(self, rank: Rank) -> Self {
        let hand = self.hand().add(rank);
        Self {
            total: hand.total,
            soft: hand.soft,
            can_blackjack: false,
        }
    }
}
