use serde::Deserialize;

use crate::error::ConfigError;

/// Largest bankroll a table may be configured with. Leaves room for a
/// blackjack payout on an all-in bet without leaving `i64` chip deltas.
pub const MAX_CHIPS: u64 = i64::MAX as u64 / 3;

fn default_starting_chips() -> u64 {
    145
}

fn default_replenish_chips() -> u64 {
    100
}

fn default_dealer_stands_on() -> u32 {
    17
}

fn default_blackjack_pays() -> String {
    "3:2".to_string()
}

fn default_dealer_draw_interval_ms() -> u32 {
    1_000
}

fn default_game_over_reset_delay_ms() -> u32 {
    2_000
}

fn default_currency() -> String {
    "₹".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default = "default_starting_chips")]
    pub starting_chips: u64,
    /// Bankroll handed out when a reset finds the player broke.
    #[serde(default = "default_replenish_chips")]
    pub replenish_chips: u64,
    #[serde(default = "default_dealer_stands_on")]
    pub dealer_stands_on: u32,
    #[serde(default = "default_blackjack_pays")]
    pub blackjack_pays: String,
    #[serde(default = "default_dealer_draw_interval_ms")]
    pub dealer_draw_interval_ms: u32,
    #[serde(default = "default_game_over_reset_delay_ms")]
    pub game_over_reset_delay_ms: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            starting_chips: default_starting_chips(),
            replenish_chips: default_replenish_chips(),
            dealer_stands_on: default_dealer_stands_on(),
            blackjack_pays: default_blackjack_pays(),
            dealer_draw_interval_ms: default_dealer_draw_interval_ms(),
            game_over_reset_delay_ms: default_game_over_reset_delay_ms(),
            currency: default_currency(),
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_chips == 0 {
            return Err(ConfigError::Zero { field: "startingChips" });
        }
        if self.replenish_chips == 0 {
            return Err(ConfigError::Zero { field: "replenishChips" });
        }
        if self.starting_chips > MAX_CHIPS {
            return Err(ConfigError::TooLarge {
                field: "startingChips",
                max: MAX_CHIPS,
            });
        }
        if self.replenish_chips > MAX_CHIPS {
            return Err(ConfigError::TooLarge {
                field: "replenishChips",
                max: MAX_CHIPS,
            });
        }
        if !(2..=21).contains(&self.dealer_stands_on) {
            return Err(ConfigError::DealerStandsOn(self.dealer_stands_on));
        }
        self.payout()?;
        Ok(())
    }

    pub fn payout(&self) -> Result<Payout, ConfigError> {
        match self.blackjack_pays.as_str() {
            "3:2" => Ok(Payout::new(3, 2)),
            "6:5" => Ok(Payout::new(6, 5)),
            "1:1" => Ok(Payout::new(1, 1)),
            other => Err(ConfigError::BlackjackPays(other.to_string())),
        }
    }
}

/// Blackjack payout ratio, applied with integer (floor) division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    numerator: u64,
    denominator: u64,
}

impl Payout {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Payout {
            numerator,
            denominator,
        }
    }

    /// Saturates at `u64::MAX`.
    pub fn apply(&self, bet: u64) -> u64 {
        let won = u128::from(bet) * u128::from(self.numerator) / u128::from(self.denominator);
        u64::try_from(won).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config = TableConfig::from_json("{}").unwrap();
        assert_eq!(config.starting_chips, 145);
        assert_eq!(config.replenish_chips, 100);
        assert_eq!(config.dealer_stands_on, 17);
        assert_eq!(config.dealer_draw_interval_ms, 1000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn camel_case_fields_override() {
        let config =
            TableConfig::from_json(r#"{"startingChips": 500, "blackjackPays": "6:5", "seed": 9}"#)
                .unwrap();
        assert_eq!(config.starting_chips, 500);
        assert_eq!(config.payout().unwrap(), Payout::new(6, 5));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            TableConfig::from_json(r#"{"startingChips": 0}"#).unwrap_err(),
            ConfigError::Zero { field: "startingChips" }
        );
        assert_eq!(
            TableConfig::from_json(r#"{"dealerStandsOn": 30}"#).unwrap_err(),
            ConfigError::DealerStandsOn(30)
        );
        assert!(matches!(
            TableConfig::from_json(r#"{"blackjackPays": "2:1"}"#),
            Err(ConfigError::BlackjackPays(_))
        ));
        assert!(matches!(
            TableConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_bankrolls_that_could_overflow() {
        let config = TableConfig {
            starting_chips: u64::MAX / 2,
            ..TableConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooLarge {
                field: "startingChips",
                max: MAX_CHIPS
            })
        );

        let config = TableConfig {
            replenish_chips: u64::MAX,
            ..TableConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { field: "replenishChips", .. })
        ));

        let config = TableConfig {
            starting_chips: MAX_CHIPS,
            replenish_chips: MAX_CHIPS,
            ..TableConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn payout_saturates_instead_of_overflowing() {
        // bet * 3 does not fit in a u64, the payout does
        assert_eq!(Payout::new(3, 2).apply(1u64 << 63), 3u64 << 62);
        assert_eq!(Payout::new(3, 2).apply(u64::MAX), u64::MAX);
        assert_eq!(Payout::new(1, 1).apply(u64::MAX), u64::MAX);
    }

    #[test]
    fn payout_floors() {
        let three_to_two = Payout::new(3, 2);
        assert_eq!(three_to_two.apply(10), 15);
        assert_eq!(three_to_two.apply(25), 37);
        assert_eq!(Payout::new(6, 5).apply(7), 8);
    }
}
