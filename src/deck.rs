use std::collections::VecDeque;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::card::{Card, Rank, Suit};

/// Where the table gets its cards from.
pub trait CardSource {
    fn draw(&mut self) -> Card;
}

/// Draws each card independently and uniformly from the 13 ranks and 4 suits.
/// There is no shoe: a card can come up again immediately.
pub struct RandomDeck {
    rng: SmallRng,
}

impl RandomDeck {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        RandomDeck { rng }
    }
}

impl CardSource for RandomDeck {
    fn draw(&mut self) -> Card {
        let suit = Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())];
        let rank = Rank::ALL[self.rng.gen_range(0..Rank::ALL.len())];
        Card::new(rank, suit)
    }
}

/// Deals a fixed sequence of cards, then falls back to random draws.
pub struct StackedDeck {
    cards: VecDeque<Card>,
    fallback: RandomDeck,
}

impl StackedDeck {
    pub fn new<I>(cards: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        StackedDeck {
            cards: cards.into_iter().collect(),
            fallback: RandomDeck::new(Some(0)),
        }
    }

    /// Stacks ranks only; suits cycle so the cards stay distinguishable.
    pub fn from_ranks(ranks: &[Rank]) -> Self {
        Self::new(
            ranks
                .iter()
                .zip(Suit::ALL.iter().cycle())
                .map(|(&rank, &suit)| Card::new(rank, suit)),
        )
    }

    pub fn remaining_cards(&self) -> usize {
        self.cards.len()
    }
}

impl CardSource for StackedDeck {
    fn draw(&mut self) -> Card {
        match self.cards.pop_front() {
            Some(card) => card,
            None => self.fallback.draw(),
        }
    }
}
