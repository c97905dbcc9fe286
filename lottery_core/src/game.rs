use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    engine::{draw_prizes, DrawOutcome, DrawParams},
    error::LotteryResult,
    participant::Participant,
    rng::RandomSource,
    settings::GameSettings,
    ui::{format_currency, UserInterface},
};

pub const DEFAULT_HUMAN_NAME: &str = "Human Player";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub rounds_played: u32,
    pub lottery_profit: Decimal,
}

/// Owns the players and drives purchase, draw and report phases round
/// after round.
pub struct LotteryGame<U, R> {
    settings: GameSettings,
    ui: U,
    rng: R,
    participants: Vec<Participant>,
    human_name: String,
    lottery_profit: Decimal,
    rounds_played: u32,
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl<U: UserInterface, R: RandomSource> LotteryGame<U, R> {
    pub fn new(settings: GameSettings, ui: U, rng: R) -> LotteryResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ui,
            rng,
            participants: Vec::new(),
            human_name: DEFAULT_HUMAN_NAME.to_string(),
            lottery_profit: Decimal::ZERO,
            rounds_played: 0,
        })
    }

    pub fn with_human_name(mut self, name: impl Into<String>) -> Self {
        self.human_name = name.into();
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participants_mut(&mut self) -> &mut Vec<Participant> {
        &mut self.participants
    }

    /// House profit accumulated since the game was initialised.
    pub fn lottery_profit(&self) -> Decimal {
        self.lottery_profit
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn into_parts(self) -> (U, R) {
        (self.ui, self.rng)
    }

    /// Seats one human and a random number of automated players, and
    /// resets the lifetime profit.
    pub fn initialize_game(&mut self) -> LotteryResult<()> {
        self.participants.clear();
        self.lottery_profit = Decimal::ZERO;
        self.rounds_played = 0;

        let balance = self.settings.starting_balance;
        self.participants
            .push(Participant::human(self.human_name.clone(), balance));

        let automated = self.rng.next(
            u64::from(self.settings.min_automated_players),
            u64::from(self.settings.max_automated_players) + 1,
        )?;
        for i in 1..=automated {
            self.participants
                .push(Participant::automated(format!("CPU Player {i}"), balance));
        }
        info!(players = self.participants.len(), "game initialised");
        Ok(())
    }

    pub fn purchase_phase(&mut self) -> LotteryResult<()> {
        let price = self.settings.ticket_price;
        let max_tickets = self.settings.max_tickets_per_round;
        for participant in &mut self.participants {
            participant.purchase_tickets(price, max_tickets, &mut self.ui, &mut self.rng)?;
        }
        Ok(())
    }

    /// Runs the draw over every participant and reports it.
    pub fn draw_prizes(&mut self) -> LotteryResult<DrawOutcome> {
        let params = DrawParams::from(&self.settings);
        let outcome = draw_prizes(&mut self.participants, &params, &mut self.rng)?;
        match &outcome {
            DrawOutcome::NoTickets => self.ui.write("No tickets purchased this round."),
            DrawOutcome::Drawn(result) => {
                self.lottery_profit += result.round_profit;
                self.ui.write(&result.summary_line(&self.participants));
                self.ui.write(&result.profit_line());
            }
        }
        Ok(outcome)
    }

    pub fn report_balances(&mut self) {
        for participant in &self.participants {
            self.ui.write(&format!(
                "{} has a balance of {}",
                participant.name,
                format_currency(participant.balance)
            ));
        }
        self.ui.write(&format!(
            "Total house profit: {}",
            format_currency(self.lottery_profit)
        ));
    }

    fn everyone_broke(&self) -> bool {
        self.participants
            .iter()
            .all(|p| p.affordable_tickets(self.settings.ticket_price) == 0)
    }

    /// Plays one round. Returns whether another round should follow.
    pub fn run_cycle(&mut self) -> LotteryResult<bool> {
        self.purchase_phase()?;
        self.draw_prizes()?;
        self.report_balances();
        self.rounds_played += 1;
        debug!(round = self.rounds_played, profit = %self.lottery_profit, "round finished");

        if self.everyone_broke() {
            self.ui
                .write("Nobody can afford another ticket. The game is over.");
            return Ok(false);
        }

        self.ui.write("Do you want to play another round? (y/n)");
        Ok(self.ui.read().is_some_and(|answer| is_affirmative(&answer)))
    }

    pub fn run_game_loop(&mut self) -> LotteryResult<GameSummary> {
        self.ui.write("Welcome to the Lottery Game!");
        while self.run_cycle()? {}

        let summary = GameSummary {
            rounds_played: self.rounds_played,
            lottery_profit: self.lottery_profit,
        };
        self.ui.write(&format!(
            "Thanks for playing! Rounds played: {}. Total house profit: {}",
            summary.rounds_played,
            format_currency(summary.lottery_profit)
        ));
        info!(rounds = summary.rounds_played, profit = %summary.lottery_profit, "game finished");
        Ok(summary)
    }
}
