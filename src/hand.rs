use serde::Serialize;

use crate::card::Card;

pub const BLACKJACK: u32 = 21;

/// Scores `cards` from scratch: `(total, soft)`, where `soft` means an Ace is
/// still counted as 11 in `total`.
pub fn hand_value<'a, I>(cards: I) -> (u32, bool)
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut total = 0;
    let mut aces = 0;

    for card in cards {
        total += card.value();
        if card.rank.is_ace() {
            aces += 1;
        }
    }

    while total > BLACKJACK && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total, aces > 0)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total(&self) -> u32 {
        hand_value(&self.cards).0
    }

    pub fn is_soft(&self) -> bool {
        hand_value(&self.cards).1
    }

    /// Total of the face-up cards only.
    pub fn visible_total(&self) -> u32 {
        hand_value(self.cards.iter().filter(|card| !card.face_down)).0
    }

    pub fn has_hidden(&self) -> bool {
        self.cards.iter().any(|card| card.face_down)
    }

    pub fn reveal_all(&mut self) {
        for card in &mut self.cards {
            card.reveal();
        }
    }

    pub fn is_bust(&self) -> bool {
        self.total() > BLACKJACK
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total() == BLACKJACK
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Hand {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        ranks.iter().map(|&rank| Card::new(rank, Suit::Clubs)).collect()
    }

    #[test]
    fn ace_king_is_blackjack() {
        let h = hand(&[Rank::Ace, Rank::King]);
        assert_eq!(h.total(), 21);
        assert!(h.is_soft());
        assert!(h.is_blackjack());
    }

    #[test]
    fn pair_of_aces_demotes_one() {
        let h = hand(&[Rank::Ace, Rank::Ace]);
        assert_eq!(h.total(), 12);
        assert!(h.is_soft());
    }

    #[test]
    fn two_aces_and_nine_make_21() {
        let h = hand(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(h.total(), 21);
        assert!(!h.is_blackjack());
    }

    #[test]
    fn five_six_king_is_hard_21() {
        let h = hand(&[Rank::Five, Rank::Six, Rank::King]);
        assert_eq!(h.total(), 21);
        assert!(!h.is_soft());
    }

    #[test]
    fn bust_only_when_no_ace_left_to_demote() {
        let h = hand(&[Rank::Ace, Rank::King, Rank::Queen, Rank::Two]);
        assert_eq!(h.total(), 23);
        assert!(!h.is_soft());
        assert!(h.is_bust());
    }

    #[test]
    fn visible_total_skips_hole_card() {
        let mut h = Hand::new();
        h.push(Card::new(Rank::King, Suit::Hearts).hidden());
        h.push(Card::new(Rank::Six, Suit::Spades));
        assert_eq!(h.visible_total(), 6);
        assert_eq!(h.total(), 16);
        assert!(h.has_hidden());

        h.reveal_all();
        assert!(!h.has_hidden());
        assert_eq!(h.visible_total(), 16);
    }

    #[test]
    fn empty_hand_scores_zero() {
        assert_eq!(Hand::new().total(), 0);
    }
}
