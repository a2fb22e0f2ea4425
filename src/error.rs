use crate::simulation::GamePhase;
use crate::Rank;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0} already has zero cards in shoe")]
    DepletedRank(Rank),
    #[error("{0} is already at its full count in shoe")]
    OverfullRank(Rank),
    #[error("cannot calculate expectation on an empty shoe")]
    EmptyShoe,
    #[error("shoe has {remaining} cards left, below the floor of {floor}")]
    ShoeBelowFloor { remaining: u16, floor: u16 },
    #[error("unknown card rank symbol {0:?}")]
    UnknownRank(String),
    #[error("invalid action value {0}")]
    InvalidAction(u8),
    #[error("player hand has no cards")]
    EmptyHand,
    #[error("player hand is already bust at {0}")]
    BustHand(u8),
    #[error("{operation} is only allowed in {expected:?} phase, current phase is {actual:?}")]
    WrongPhase {
        operation: &'static str,
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("dealing shoe ran out of cards")]
    NoCardsLeft,
}

pub type Result<T> = std::result::Result<T, Error>;
