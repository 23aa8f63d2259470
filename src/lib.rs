//! Single-player blackjack: one round engine with Ace-adjusted scoring, a
//! paced dealer and a chip bankroll, plus a `wasm-bindgen` surface for the
//! page that renders it.

pub mod card;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod hand;
pub mod pacing;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod bindings;

#[cfg(target_arch = "wasm32")]
pub use bindings::BlackjackTable;

pub use card::{Card, Rank, Suit};
pub use config::TableConfig;
pub use deck::{CardSource, RandomDeck, StackedDeck};
pub use engine::{DealerTick, Outcome, Phase, Resolution, RoundEngine};
pub use error::{ActionError, ConfigError};
pub use hand::Hand;
pub use view::TableView;
