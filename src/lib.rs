pub mod advisor;
pub mod calculation;
mod error;
pub mod hand;
pub mod shoe;
pub mod simulation;
mod statearray;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use std::{fmt, str::FromStr};
use strum_macros::EnumIter;

pub use advisor::{Advisor, Strategy};
pub use calculation::{Engine, Expectations};
pub use error::{Error, Result};
pub use hand::{evaluate_hand, DealerTotal, HandTotal};
pub use shoe::Shoe;
pub use statearray::{Frame, FrameTable};

/// Number of distinct ranks in a deck, and the length of a shoe's count array.
pub const NUMBER_OF_RANKS: usize = 13;

/// Table rules the engine honours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub number_of_decks: u8,
    pub dealer_hit_on_soft17: bool,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 6,
            dealer_hit_on_soft17: false,
        }
    }
}

/// Bounds on the game-tree search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Cache sub-results by canonical recursion frame.
    pub memoize: bool,
    /// Refuse to evaluate when fewer cards than this remain in the shoe.
    pub min_cards_in_shoe: u16,
    /// Maximum number of extra player cards explored after a hit. Beyond it the
    /// player is assumed to stand. `None` explores every card sequence.
    pub max_player_draws: Option<u8>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            memoize: true,
            min_cards_in_shoe: 1,
            max_player_draws: None,
        }
    }
}

/// A card rank. Suits never matter for blackjack, so they are not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// Position of this rank in a shoe's count array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Point value with Ace counted high. Whether an Ace drops to 1 depends on
    /// the rest of the hand, see [`HandTotal::add`].
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            _ => self.blackjack_value(),
        }
    }

    /// Point value with Ace counted as 1, in `[1, 10]`.
    pub fn blackjack_value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            _ => self as u8 + 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "A" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            _ => return Err(Error::UnknownRank(String::from(s))),
        };
        Ok(rank)
    }
}

/// Parses a comma or whitespace separated list of rank symbols, e.g. `"A, 10 K"`.
pub fn parse_ranks(symbols: &str) -> Result<Vec<Rank>> {
    symbols
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// A player action. The numeric values (`Stand = 0`, `Hit = 1`, `Double = 2`)
/// are relied upon by presentation layers and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_enum_str, Deserialize_enum_str)]
pub enum Action {
    Stand,
    Hit,
    #[serde(rename = "Double Down")]
    Double,
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        match action {
            Action::Stand => 0,
            Action::Hit => 1,
            Action::Double => 2,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Action::Stand),
            1 => Ok(Action::Hit),
            2 => Ok(Action::Double),
            _ => Err(Error::InvalidAction(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn rank_values() {
        let values: Vec<u8> = Rank::iter().map(Rank::value).collect();
        assert_eq!(values, vec![11, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10]);
        assert_eq!(Rank::Ace.blackjack_value(), 1);
        assert_eq!(Rank::Nine.blackjack_value(), 9);
        assert_eq!(Rank::Queen.blackjack_value(), 10);
        assert_eq!(Rank::iter().count(), NUMBER_OF_RANKS);
    }

    #[test]
    fn rank_symbols_round_trip_through_parse() {
        for rank in Rank::iter() {
            assert_eq!(rank.to_string().parse::<Rank>(), Ok(rank));
        }
        assert_eq!("t".parse::<Rank>(), Ok(Rank::Ten));
        assert_eq!(" q ".parse::<Rank>(), Ok(Rank::Queen));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        assert_eq!(
            "11".parse::<Rank>(),
            Err(Error::UnknownRank(String::from("11")))
        );
        assert!(parse_ranks("A, X").is_err());
        assert_eq!(
            parse_ranks("A,10 k").unwrap(),
            vec![Rank::Ace, Rank::Ten, Rank::King]
        );
    }

    #[test]
    fn action_numeric_contract() {
        assert_eq!(u8::from(Action::Stand), 0);
        assert_eq!(u8::from(Action::Hit), 1);
        assert_eq!(u8::from(Action::Double), 2);
        for value in 0..3 {
            assert_eq!(u8::from(Action::try_from(value).unwrap()), value);
        }
        assert_eq!(Action::try_from(3), Err(Error::InvalidAction(3)));
    }

    #[test]
    fn action_display_names() {
        assert_eq!(Action::Stand.to_string(), "Stand");
        assert_eq!(Action::Hit.to_string(), "Hit");
        assert_eq!(Action::Double.to_string(), "Double Down");
        assert_eq!("Double Down".parse::<Action>().unwrap(), Action::Double);
    }
}
