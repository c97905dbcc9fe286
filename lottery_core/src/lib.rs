pub mod engine;
pub mod error;
pub mod game;
pub mod participant;
pub mod rng;
pub mod settings;
pub mod ui;

pub use crate::engine::{
    build_ticket_pool, draw_prizes, split_pool, tier_winner_count, Award, DrawOutcome, DrawParams,
    DrawResult, PrizeTier, HOUSE_CUT,
};
pub use crate::error::{LotteryError, LotteryResult, RngError, SettingsError};
pub use crate::game::{GameSummary, LotteryGame, DEFAULT_HUMAN_NAME};
pub use crate::participant::{Participant, ParticipantKind};
pub use crate::rng::{derive_hash_hex, unit_float, ProvablyFairRng, RandomSource, ScriptedRandom, SeededRandom};
pub use crate::settings::{GameSettings, PrizeDistribution};
pub use crate::ui::{format_currency, ScriptedUi, UserInterface};
