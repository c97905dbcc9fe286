use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RngError {
    #[error("invalid range: min {min} must be less than max {max}")]
    InvalidRange { min: u64, max: u64 },
    #[error("scripted random source exhausted")]
    Exhausted,
    #[error("random value {value} outside requested range [{min}, {max})")]
    OutOfRange { value: u64, min: u64, max: u64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("ticket price must be greater than zero (got {0})")]
    NonPositiveTicketPrice(Decimal),
    #[error("starting balance must not be negative (got {0})")]
    NegativeStartingBalance(Decimal),
    #[error("min automated players ({min}) exceeds max automated players ({max})")]
    AutomatedPlayerBounds { min: u32, max: u32 },
    #[error("max tickets per round must be greater than zero")]
    ZeroMaxTickets,
    #[error("{tier} fraction {value} must lie in [0, 1]")]
    FractionOutOfRange { tier: &'static str, value: Decimal },
    #[error("prize fractions sum to {0}, more than the round revenue")]
    FractionsExceedRevenue(Decimal),
}

#[derive(thiserror::Error, Debug)]
pub enum LotteryError {
    #[error(transparent)]
    Rng(#[from] RngError),
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to read settings file {}: {source}", .path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}

pub type LotteryResult<T> = Result<T, LotteryError>;
