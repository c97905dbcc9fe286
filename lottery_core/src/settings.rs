use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LotteryError, LotteryResult, SettingsError};

/// Share of a round's revenue paid into each prize tier.
///
/// The fractions need not sum to one; whatever they leave over (besides the
/// fixed house cut) simply stays undistributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrizeDistribution {
    pub grand_prize_fraction: Decimal,
    pub second_tier_fraction: Decimal,
    pub third_tier_fraction: Decimal,
}

impl Default for PrizeDistribution {
    fn default() -> Self {
        Self {
            grand_prize_fraction: Decimal::new(5, 1),
            second_tier_fraction: Decimal::new(3, 1),
            third_tier_fraction: Decimal::new(1, 1),
        }
    }
}

impl PrizeDistribution {
    pub fn total(&self) -> Decimal {
        self.grand_prize_fraction + self.second_tier_fraction + self.third_tier_fraction
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (tier, value) in [
            ("grand prize", self.grand_prize_fraction),
            ("second tier", self.second_tier_fraction),
            ("third tier", self.third_tier_fraction),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(SettingsError::FractionOutOfRange { tier, value });
            }
        }
        let total = self.total();
        if total > Decimal::ONE {
            return Err(SettingsError::FractionsExceedRevenue(total));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub starting_balance: Decimal,
    pub ticket_price: Decimal,
    pub min_automated_players: u32,
    pub max_automated_players: u32,
    pub max_tickets_per_round: u32,
    pub prize_distribution: PrizeDistribution,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::new(10, 0),
            ticket_price: Decimal::ONE,
            min_automated_players: 1,
            max_automated_players: 3,
            max_tickets_per_round: 10,
            prize_distribution: PrizeDistribution::default(),
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.ticket_price <= Decimal::ZERO {
            return Err(SettingsError::NonPositiveTicketPrice(self.ticket_price));
        }
        if self.starting_balance < Decimal::ZERO {
            return Err(SettingsError::NegativeStartingBalance(self.starting_balance));
        }
        if self.min_automated_players > self.max_automated_players {
            return Err(SettingsError::AutomatedPlayerBounds {
                min: self.min_automated_players,
                max: self.max_automated_players,
            });
        }
        if self.max_tickets_per_round == 0 {
            return Err(SettingsError::ZeroMaxTickets);
        }
        self.prize_distribution.validate()
    }

    /// Parses and validates a JSON settings document. Missing keys take
    /// their default values.
    pub fn from_json_str(json: &str) -> LotteryResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> LotteryResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| LotteryError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        debug!(path = %path.display(), ?settings, "loaded game settings");
        Ok(settings)
    }
}
