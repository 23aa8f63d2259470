use serde::Serialize;

use crate::{
    card::{Card, Rank, Suit},
    engine::{AvailableActions, Phase, Resolution, RoundEngine},
    hand::Hand,
};

/// A card as the player may see it. Face-down cards carry no suit or rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suit: Option<Suit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    pub face_down: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        if card.face_down {
            CardView {
                suit: None,
                rank: None,
                face_down: true,
            }
        } else {
            CardView {
                suit: Some(card.suit),
                rank: Some(card.rank),
                face_down: false,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHandView {
    pub cards: Vec<CardView>,
    pub total: u32,
    pub soft: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerHandView {
    pub cards: Vec<CardView>,
    /// Full total; withheld while the hole card is down.
    pub total: Option<u32>,
    pub visible_total: u32,
    pub hole_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub chips: u64,
    pub bet: u64,
    pub phase: Phase,
    pub message: String,
    pub player: PlayerHandView,
    pub dealer: DealerHandView,
    pub actions: AvailableActions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

fn card_views(hand: &Hand) -> Vec<CardView> {
    hand.cards().iter().map(CardView::from).collect()
}

impl TableView {
    pub fn from_engine(engine: &RoundEngine) -> Self {
        let player = engine.player_hand();
        let dealer = engine.dealer_hand();
        let hole_hidden = dealer.has_hidden();

        TableView {
            chips: engine.chips(),
            bet: engine.bet(),
            phase: engine.phase(),
            message: engine.message().to_string(),
            player: PlayerHandView {
                cards: card_views(player),
                total: player.total(),
                soft: player.is_soft(),
            },
            dealer: DealerHandView {
                cards: card_views(dealer),
                total: (!hole_hidden).then(|| dealer.total()),
                visible_total: dealer.visible_total(),
                hole_hidden,
            },
            actions: engine.available_actions(),
            resolution: engine.resolution().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TableConfig, deck::StackedDeck};

    #[test]
    fn hole_card_is_masked_during_player_turn() {
        let deck = StackedDeck::from_ranks(&[Rank::Nine, Rank::Ace, Rank::Seven, Rank::Six]);
        let mut engine = RoundEngine::with_deck(TableConfig::default(), deck).unwrap();
        engine.place_bet(20).unwrap();
        engine.start_round().unwrap();

        let view = engine.view();
        assert!(view.dealer.hole_hidden);
        assert_eq!(view.dealer.total, None);
        assert_eq!(view.dealer.visible_total, 6);
        assert_eq!(view.dealer.cards[0].rank, None);
        assert_eq!(view.dealer.cards[1].rank, Some(Rank::Six));
        assert_eq!(view.player.total, 16);
        assert!(view.actions.can_double);
        assert!(!view.actions.can_start);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["dealer"]["cards"][0], serde_json::json!({ "faceDown": true }));
        assert_eq!(json["phase"], "PlayerTurn");
        assert!(json["dealer"]["total"].is_null());
    }

    #[test]
    fn resolved_view_shows_everything() {
        let deck = StackedDeck::from_ranks(&[Rank::Ten, Rank::Ace, Rank::Nine, Rank::Seven]);
        let mut engine = RoundEngine::with_deck(TableConfig::default(), deck).unwrap();
        engine.place_bet(10).unwrap();
        engine.start_round().unwrap();
        engine.stand().unwrap();
        engine.play_dealer_out().unwrap();

        let view = engine.view();
        assert!(!view.dealer.hole_hidden);
        assert_eq!(view.dealer.total, Some(18));
        assert_eq!(view.message, "You win!");
        assert_eq!(view.resolution.map(|r| r.chip_delta), Some(10));
        assert!(view.actions.can_start);
    }
}
