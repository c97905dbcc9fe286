use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::RngError,
    participant::Participant,
    rng::RandomSource,
    settings::{GameSettings, PrizeDistribution},
    ui::format_currency,
};

/// Fixed share of revenue kept by the house, regardless of the tier fractions.
pub const HOUSE_CUT: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// Second tier winners per ticket sold.
pub const SECOND_TIER_WINNER_RATIO: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// Third tier winners per ticket sold.
pub const THIRD_TIER_WINNER_RATIO: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq)]
pub struct DrawParams {
    pub ticket_price: Decimal,
    pub prize_distribution: PrizeDistribution,
}

impl From<&GameSettings> for DrawParams {
    fn from(settings: &GameSettings) -> Self {
        Self {
            ticket_price: settings.ticket_price,
            prize_distribution: settings.prize_distribution.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrizeTier {
    Grand,
    Second,
    Third,
}

/// A single credit applied to a participant's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    /// Index into the participant slice the draw ran over.
    pub participant: usize,
    pub tier: PrizeTier,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    pub total_tickets: u64,
    pub revenue: Decimal,
    pub grand_prize_amount: Decimal,
    pub second_tier_pool_amount: Decimal,
    pub third_tier_pool_amount: Decimal,
    pub grand_winner: Option<usize>,
    pub second_tier_target: usize,
    pub second_tier_winners: Vec<usize>,
    pub third_tier_target: usize,
    pub third_tier_winners: Vec<usize>,
    pub awards: Vec<Award>,
    pub round_profit: Decimal,
}

impl DrawResult {
    /// Sum of every credit applied by the draw.
    pub fn total_awarded(&self) -> Decimal {
        self.awards.iter().map(|a| a.amount).sum()
    }

    pub fn awarded_to(&self, participant: usize) -> Decimal {
        self.awards
            .iter()
            .filter(|a| a.participant == participant)
            .map(|a| a.amount)
            .sum()
    }

    pub fn summary_line(&self, participants: &[Participant]) -> String {
        let grand_name = self
            .grand_winner
            .and_then(|i| participants.get(i))
            .map(|p| p.name.as_str())
            .unwrap_or("none");
        format!(
            "Prizes distributed: Grand - {} (Winner: {}), Second - {} shared by {} winners, Third - {} shared by {} winners",
            format_currency(self.grand_prize_amount),
            grand_name,
            format_currency(self.second_tier_pool_amount),
            self.second_tier_winners.len(),
            format_currency(self.third_tier_pool_amount),
            self.third_tier_winners.len()
        )
    }

    pub fn profit_line(&self) -> String {
        format!(
            "Lottery profit for this round: {}",
            format_currency(self.round_profit)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// Nobody bought a ticket; nothing was drawn or credited.
    NoTickets,
    Drawn(DrawResult),
}

/// One entry per ticket, holding the owning participant's index.
pub fn build_ticket_pool(participants: &[Participant]) -> Vec<usize> {
    participants
        .iter()
        .enumerate()
        .flat_map(|(idx, p)| std::iter::repeat(idx).take(p.tickets_purchased as usize))
        .collect()
}

/// `round(total_tickets * ratio)`, midpoints to the nearest even count.
pub fn tier_winner_count(total_tickets: u64, ratio: Decimal) -> usize {
    (Decimal::from(total_tickets) * ratio)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_usize()
        .unwrap_or(0)
}

/// Splits `pool` evenly over `winners`. Shares are cut two decimal places
/// below the pool's own precision and the residue goes to the first share,
/// so the parts always add back up to `pool`.
pub fn split_pool(pool: Decimal, winners: usize) -> Vec<Decimal> {
    if winners == 0 {
        return Vec::new();
    }
    let count = Decimal::from(winners);
    let scale = (pool.scale() + 2).min(Decimal::MAX_SCALE);
    let share = (pool / count).round_dp_with_strategy(scale, RoundingStrategy::ToZero);
    let mut shares = vec![share; winners];
    shares[0] += pool - share * count;
    shares
}

/// Draws up to `target` distinct, not yet selected participants from the
/// ticket pool, giving up after `2 * pool.len()` draws.
fn draw_tier(
    pool: &[usize],
    target: usize,
    selected: &mut [bool],
    rng: &mut dyn RandomSource,
) -> Result<Vec<usize>, RngError> {
    let mut winners = Vec::with_capacity(target);
    let max_attempts = pool.len() * 2;
    let mut attempts = 0;
    while winners.len() < target && attempts < max_attempts {
        let slot = rng.next(0, pool.len() as u64)?;
        let candidate = *pool.get(slot as usize).ok_or(RngError::OutOfRange {
            value: slot,
            min: 0,
            max: pool.len() as u64,
        })?;
        if !selected[candidate] {
            selected[candidate] = true;
            winners.push(candidate);
        }
        attempts += 1;
    }
    debug!(wanted = target, found = winners.len(), attempts, "tier drawn");
    Ok(winners)
}

/// Runs one three-tier draw over `participants` and credits the winners.
///
/// Selection is weighted by tickets held and no participant wins more than
/// one tier. Balances are only touched after all three tiers have been
/// drawn, so a failing random source leaves every participant unchanged.
pub fn draw_prizes(
    participants: &mut [Participant],
    params: &DrawParams,
    rng: &mut dyn RandomSource,
) -> Result<DrawOutcome, RngError> {
    let total_tickets: u64 = participants
        .iter()
        .map(|p| u64::from(p.tickets_purchased))
        .sum();
    if total_tickets == 0 {
        info!("no tickets purchased, skipping draw");
        return Ok(DrawOutcome::NoTickets);
    }

    let distribution = &params.prize_distribution;
    let revenue = Decimal::from(total_tickets) * params.ticket_price;
    let grand_prize_amount = revenue * distribution.grand_prize_fraction;
    let second_tier_pool_amount = revenue * distribution.second_tier_fraction;
    let third_tier_pool_amount = revenue * distribution.third_tier_fraction;
    let round_profit = revenue * HOUSE_CUT;

    let pool = build_ticket_pool(participants);
    debug!(pool_size = pool.len(), participants = participants.len(), "ticket pool built");
    let mut selected = vec![false; participants.len()];

    let grand_winner = draw_tier(&pool, 1, &mut selected, rng)?.first().copied();

    let second_tier_target = tier_winner_count(total_tickets, SECOND_TIER_WINNER_RATIO);
    let second_tier_winners = draw_tier(&pool, second_tier_target, &mut selected, rng)?;

    let third_tier_target = tier_winner_count(total_tickets, THIRD_TIER_WINNER_RATIO);
    let third_tier_winners = draw_tier(&pool, third_tier_target, &mut selected, rng)?;

    let mut awards = Vec::new();
    if let Some(winner) = grand_winner {
        awards.push(Award {
            participant: winner,
            tier: PrizeTier::Grand,
            amount: grand_prize_amount,
        });
    }
    for (tier, winners, tier_pool) in [
        (PrizeTier::Second, &second_tier_winners, second_tier_pool_amount),
        (PrizeTier::Third, &third_tier_winners, third_tier_pool_amount),
    ] {
        if winners.is_empty() && tier_pool > Decimal::ZERO {
            warn!(?tier, pool = %tier_pool, "no winners found, pool left undistributed");
        }
        let shares = split_pool(tier_pool, winners.len());
        awards.extend(winners.iter().zip(shares).map(|(&participant, amount)| Award {
            participant,
            tier,
            amount,
        }));
    }

    for award in &awards {
        participants[award.participant].credit(award.amount);
    }

    let result = DrawResult {
        total_tickets,
        revenue,
        grand_prize_amount,
        second_tier_pool_amount,
        third_tier_pool_amount,
        grand_winner,
        second_tier_target,
        second_tier_winners,
        third_tier_target,
        third_tier_winners,
        awards,
        round_profit,
    };
    info!(
        total_tickets,
        revenue = %revenue,
        awarded = %result.total_awarded(),
        profit = %round_profit,
        "draw complete"
    );
    Ok(DrawOutcome::Drawn(result))
}
