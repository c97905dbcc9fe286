use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::RngError,
    rng::RandomSource,
    ui::{format_currency, UserInterface},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantKind {
    /// Chooses a ticket count through the user interface.
    Human,
    /// Chooses a ticket count with the random source.
    Automated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub balance: Decimal,
    pub tickets_purchased: u32,
    pub kind: ParticipantKind,
}

impl Participant {
    pub fn new(name: impl Into<String>, balance: Decimal, kind: ParticipantKind) -> Self {
        Self {
            name: name.into(),
            balance,
            tickets_purchased: 0,
            kind,
        }
    }

    pub fn human(name: impl Into<String>, balance: Decimal) -> Self {
        Self::new(name, balance, ParticipantKind::Human)
    }

    pub fn automated(name: impl Into<String>, balance: Decimal) -> Self {
        Self::new(name, balance, ParticipantKind::Automated)
    }

    pub fn with_tickets(mut self, tickets: u32) -> Self {
        self.tickets_purchased = tickets;
        self
    }

    /// Whole tickets the current balance pays for.
    pub fn affordable_tickets(&self, ticket_price: Decimal) -> u32 {
        if ticket_price <= Decimal::ZERO || self.balance <= Decimal::ZERO {
            return 0;
        }
        (self.balance / ticket_price)
            .floor()
            .to_u32()
            .unwrap_or(u32::MAX)
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Buys this round's tickets, overwriting the previous round's count.
    ///
    /// Humans are prompted through `ui`; automated players ask `rng` for a
    /// count in `[1, max_tickets]`. Either way the purchase is clamped to what
    /// the balance affords. Returns the number of tickets bought.
    pub fn purchase_tickets(
        &mut self,
        ticket_price: Decimal,
        max_tickets: u32,
        ui: &mut dyn UserInterface,
        rng: &mut dyn RandomSource,
    ) -> Result<u32, RngError> {
        match self.kind {
            ParticipantKind::Human => Ok(self.purchase_interactively(ticket_price, max_tickets, ui)),
            ParticipantKind::Automated => self.purchase_automatically(ticket_price, max_tickets, ui, rng),
        }
    }

    fn purchase_interactively(
        &mut self,
        ticket_price: Decimal,
        max_tickets: u32,
        ui: &mut dyn UserInterface,
    ) -> u32 {
        ui.write(&format!(
            "{}, your balance is {}. Tickets cost {}. How many tickets would you like to buy?",
            self.name,
            format_currency(self.balance),
            format_currency(ticket_price)
        ));

        let requested = ui.read().and_then(|line| line.trim().parse::<u32>().ok());
        let Some(requested) = requested else {
            debug!(player = %self.name, "unparseable ticket request");
            self.tickets_purchased = 0;
            ui.write("Invalid purchase amount. Try again.");
            return 0;
        };

        let desired = requested.min(max_tickets);
        self.settle_purchase(desired, ticket_price, ui)
    }

    fn purchase_automatically(
        &mut self,
        ticket_price: Decimal,
        max_tickets: u32,
        ui: &mut dyn UserInterface,
        rng: &mut dyn RandomSource,
    ) -> Result<u32, RngError> {
        let desired = rng.next(1, u64::from(max_tickets) + 1)?;
        let desired = u32::try_from(desired).unwrap_or(max_tickets);
        Ok(self.settle_purchase(desired, ticket_price, ui))
    }

    fn settle_purchase(&mut self, desired: u32, ticket_price: Decimal, ui: &mut dyn UserInterface) -> u32 {
        let purchased = desired.min(self.affordable_tickets(ticket_price));
        self.tickets_purchased = purchased;
        self.balance -= Decimal::from(purchased) * ticket_price;
        debug!(player = %self.name, desired, purchased, balance = %self.balance, "tickets purchased");

        if purchased == 0 && desired > 0 {
            ui.write(&format!(
                "{}: Insufficient funds to purchase any tickets.",
                self.name
            ));
        } else {
            ui.write(&format!(
                "{} purchased {} tickets. Remaining balance: {}",
                self.name,
                purchased,
                format_currency(self.balance)
            ));
        }
        purchased
    }
}
