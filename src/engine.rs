use serde::Serialize;
use tracing::{debug, info};

use crate::{
    card::Card,
    config::{Payout, TableConfig},
    deck::{CardSource, RandomDeck},
    error::{ActionError, ConfigError},
    hand::{Hand, BLACKJACK},
    view::TableView,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    AwaitingBet,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

impl Phase {
    /// A round is active from the deal until it resolves.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::PlayerTurn | Phase::DealerTurn)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Blackjack,
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Push,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Blackjack => "Blackjack! You win 1.5x your bet!",
            Outcome::PlayerBust => "Bust! You went over 21.",
            Outcome::DealerBust => "Dealer busted! You win!",
            Outcome::PlayerWins => "You win!",
            Outcome::DealerWins => "Dealer wins!",
            Outcome::Push => "It's a push! Bet returned.",
        }
    }

    fn compare(player_total: u32, dealer_total: u32) -> Outcome {
        if player_total > BLACKJACK {
            Outcome::PlayerBust
        } else if dealer_total > BLACKJACK {
            Outcome::DealerBust
        } else if player_total > dealer_total {
            Outcome::PlayerWins
        } else if player_total < dealer_total {
            Outcome::DealerWins
        } else {
            Outcome::Push
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub outcome: Outcome,
    pub bet: u64,
    pub chip_delta: i64,
    pub player_total: u32,
    pub dealer_total: u32,
}

/// What one step of the dealer's turn did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DealerTick {
    Drew(Card),
    Stood(Resolution),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Player {
    chips: u64,
    bet: u64,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Round {
    player_hand: Hand,
    dealer_hand: Hand,
    phase: Phase,
    resolution: Option<Resolution>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableActions {
    pub can_bet: bool,
    pub can_start: bool,
    pub can_hit: bool,
    pub can_stand: bool,
    pub can_double: bool,
    pub can_reset: bool,
}

pub struct RoundEngine {
    config: TableConfig,
    payout: Payout,
    deck: Box<dyn CardSource>,
    player: Player,
    round: Round,
    message: String,
}

impl RoundEngine {
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        let deck = RandomDeck::new(config.seed);
        Self::with_deck(config, deck)
    }

    pub fn with_deck<D>(config: TableConfig, deck: D) -> Result<Self, ConfigError>
    where
        D: CardSource + 'static,
    {
        config.validate()?;
        let payout = config.payout()?;
        let player = Player {
            chips: config.starting_chips,
            bet: 0,
        };
        Ok(RoundEngine {
            config,
            payout,
            deck: Box::new(deck),
            player,
            round: Round::default(),
            message: "Place your bet to start a new game!".to_string(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn chips(&self) -> u64 {
        self.player.chips
    }

    pub fn bet(&self) -> u64 {
        self.player.bet
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    pub fn player_hand(&self) -> &Hand {
        &self.round.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.round.dealer_hand
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.round.resolution.as_ref()
    }

    pub fn is_bankrupt(&self) -> bool {
        self.player.chips == 0
    }

    pub fn view(&self) -> TableView {
        TableView::from_engine(self)
    }

    pub fn available_actions(&self) -> AvailableActions {
        let phase = self.round.phase;
        let Player { chips, bet } = self.player;
        let player_turn = phase == Phase::PlayerTurn;
        AvailableActions {
            can_bet: !phase.is_active(),
            can_start: !phase.is_active() && bet > 0 && bet <= chips,
            can_hit: player_turn,
            can_stand: player_turn,
            can_double: player_turn
                && self.round.player_hand.len() == 2
                && bet.checked_mul(2).is_some_and(|needed| needed <= chips),
            can_reset: !phase.is_active(),
        }
    }

    pub fn place_bet(&mut self, amount: u64) -> Result<(), ActionError> {
        if self.round.phase.is_active() {
            return self.reject(ActionError::RoundInProgress);
        }
        if amount == 0 {
            return self.reject(ActionError::ZeroBet);
        }
        if amount > self.player.chips {
            return self.reject(ActionError::InsufficientChips {
                bet: amount,
                chips: self.player.chips,
            });
        }

        self.player.bet = amount;
        self.message = format!("Bet placed: {}{amount}. Ready to deal!", self.config.currency);
        debug!(bet = amount, "bet placed");
        Ok(())
    }

    /// Deals a new round. A resolved round can be followed straight away; the
    /// previous bet carries over.
    pub fn start_round(&mut self) -> Result<(), ActionError> {
        if self.round.phase.is_active() {
            return self.reject(ActionError::RoundInProgress);
        }
        if self.player.bet == 0 {
            return self.reject(ActionError::NoBet);
        }
        if self.player.bet > self.player.chips {
            return self.reject(ActionError::InsufficientChips {
                bet: self.player.bet,
                chips: self.player.chips,
            });
        }

        self.round = Round {
            phase: Phase::PlayerTurn,
            ..Round::default()
        };
        let first = self.deck.draw();
        self.round.player_hand.push(first);
        let hole = self.deck.draw().hidden();
        self.round.dealer_hand.push(hole);
        let second = self.deck.draw();
        self.round.player_hand.push(second);
        let up = self.deck.draw();
        self.round.dealer_hand.push(up);

        info!(
            bet = self.player.bet,
            chips = self.player.chips,
            player_total = self.round.player_hand.total(),
            dealer_up = %up,
            "round started"
        );

        if self.round.player_hand.total() == BLACKJACK {
            self.resolve(Outcome::Blackjack);
        } else {
            self.message = "Hit, stand or double down.".to_string();
        }
        Ok(())
    }

    pub fn hit(&mut self) -> Result<Card, ActionError> {
        self.ensure_player_turn()?;
        let card = self.deck.draw();
        self.round.player_hand.push(card);
        let total = self.round.player_hand.total();
        debug!(%card, total, "player hits");

        if total > BLACKJACK {
            self.resolve(Outcome::PlayerBust);
        } else if total == BLACKJACK {
            self.begin_dealer_turn();
        }
        Ok(card)
    }

    pub fn stand(&mut self) -> Result<(), ActionError> {
        self.ensure_player_turn()?;
        debug!(total = self.round.player_hand.total(), "player stands");
        self.begin_dealer_turn();
        Ok(())
    }

    pub fn double_down(&mut self) -> Result<Card, ActionError> {
        self.ensure_player_turn()?;
        let cards = self.round.player_hand.len();
        if cards != 2 {
            return self.reject(ActionError::DoubleNotAllowed { cards });
        }
        let needed = self.player.bet.saturating_mul(2);
        if needed > self.player.chips {
            return self.reject(ActionError::InsufficientChipsToDouble {
                needed,
                chips: self.player.chips,
            });
        }

        self.player.bet = needed;
        let card = self.deck.draw();
        self.round.player_hand.push(card);
        debug!(%card, bet = needed, total = self.round.player_hand.total(), "player doubles");

        if self.round.player_hand.is_bust() {
            self.resolve(Outcome::PlayerBust);
        } else {
            self.begin_dealer_turn();
        }
        Ok(card)
    }

    /// One step of the dealer's turn: draw below the stand threshold,
    /// otherwise stand and settle the round.
    pub fn dealer_tick(&mut self) -> Result<DealerTick, ActionError> {
        if self.round.phase != Phase::DealerTurn {
            return self.reject(ActionError::NotDealerTurn {
                phase: self.round.phase,
            });
        }

        if self.round.dealer_hand.total() < self.config.dealer_stands_on {
            let card = self.deck.draw();
            self.round.dealer_hand.push(card);
            debug!(%card, total = self.round.dealer_hand.total(), "dealer draws");
            return Ok(DealerTick::Drew(card));
        }

        let outcome = Outcome::compare(
            self.round.player_hand.total(),
            self.round.dealer_hand.total(),
        );
        Ok(DealerTick::Stood(self.resolve(outcome)))
    }

    /// Runs the dealer's turn to the end without pacing.
    pub fn play_dealer_out(&mut self) -> Result<Resolution, ActionError> {
        loop {
            if let DealerTick::Stood(resolution) = self.dealer_tick()? {
                return Ok(resolution);
            }
        }
    }

    pub fn reset_round(&mut self) -> Result<(), ActionError> {
        if self.round.phase.is_active() {
            return self.reject(ActionError::RoundInProgress);
        }

        self.player.bet = 0;
        self.round = Round::default();

        if self.player.chips == 0 {
            self.player.chips = self.config.replenish_chips;
            self.message = format!(
                "New game started with {}{} chips!",
                self.config.currency, self.config.replenish_chips
            );
            info!(chips = self.player.chips, "bankroll replenished");
        } else {
            self.message = "Place your bet to start a new game!".to_string();
        }
        Ok(())
    }

    /// Announces the end of the game when a resolved round left the player
    /// broke. Returns whether it did.
    pub fn mark_game_over(&mut self) -> bool {
        if self.round.phase == Phase::Resolved && self.is_bankrupt() {
            self.message = "Game over! You're out of chips.".to_string();
            true
        } else {
            false
        }
    }

    fn ensure_player_turn(&mut self) -> Result<(), ActionError> {
        if self.round.phase != Phase::PlayerTurn {
            return self.reject(ActionError::NotPlayerTurn {
                phase: self.round.phase,
            });
        }
        Ok(())
    }

    fn begin_dealer_turn(&mut self) {
        self.round.dealer_hand.reveal_all();
        self.round.phase = Phase::DealerTurn;
        self.message = "Dealer's turn.".to_string();
        debug!(total = self.round.dealer_hand.total(), "dealer reveals hole card");
    }

    fn resolve(&mut self, outcome: Outcome) -> Resolution {
        self.round.dealer_hand.reveal_all();

        let bet = self.player.bet;
        let chip_delta = match outcome {
            Outcome::Blackjack => {
                let won = self.payout.apply(bet);
                self.player.chips = self.player.chips.saturating_add(won);
                i64::try_from(won).unwrap_or(i64::MAX)
            }
            Outcome::DealerBust | Outcome::PlayerWins => {
                self.player.chips = self.player.chips.saturating_add(bet);
                i64::try_from(bet).unwrap_or(i64::MAX)
            }
            Outcome::PlayerBust | Outcome::DealerWins => {
                self.player.chips = self.player.chips.saturating_sub(bet);
                i64::try_from(bet).map_or(i64::MIN, |lost| -lost)
            }
            Outcome::Push => 0,
        };
        // A carried bet must still fit the bankroll; make the player bet again.
        if self.player.bet > self.player.chips {
            self.player.bet = 0;
        }

        let resolution = Resolution {
            outcome,
            bet,
            chip_delta,
            player_total: self.round.player_hand.total(),
            dealer_total: self.round.dealer_hand.total(),
        };
        self.round.phase = Phase::Resolved;
        self.round.resolution = Some(resolution);
        self.message = outcome.message().to_string();

        info!(
            ?outcome,
            chip_delta,
            chips = self.player.chips,
            player_total = resolution.player_total,
            dealer_total = resolution.dealer_total,
            "round resolved"
        );
        resolution
    }

    fn reject<T>(&mut self, err: ActionError) -> Result<T, ActionError> {
        debug!(%err, phase = ?self.round.phase, "action rejected");
        self.message = err.to_string();
        Err(err)
    }
}
