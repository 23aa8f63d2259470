use crate::engine::Phase;

/// Why an action was refused. Every refusal leaves the table unchanged; the
/// display text is what the player sees.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("Not enough chips for that bet!")]
    InsufficientChips { bet: u64, chips: u64 },
    #[error("Bet must be greater than zero!")]
    ZeroBet,
    #[error("Please place a bet first!")]
    NoBet,
    #[error("Finish the current round first!")]
    RoundInProgress,
    #[error("It's not your turn!")]
    NotPlayerTurn { phase: Phase },
    #[error("The dealer is not playing!")]
    NotDealerTurn { phase: Phase },
    #[error("You can only double down on your first two cards!")]
    DoubleNotAllowed { cards: usize },
    #[error("Not enough chips to double down!")]
    InsufficientChipsToDouble { needed: u64, chips: u64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },
    #[error("dealer must stand on a total between 2 and 21, got {0}")]
    DealerStandsOn(u32),
    #[error("unknown blackjack payout: {0}")]
    BlackjackPays(String),
    #[error("invalid config: {0}")]
    Parse(String),
}
