use std::collections::VecDeque;

use rust_decimal::Decimal;

/// Line-oriented text channel to the players.
pub trait UserInterface {
    fn write(&mut self, message: &str);
    /// Blocking read of one line; `None` at end of input.
    fn read(&mut self) -> Option<String>;
}

impl<T: UserInterface + ?Sized> UserInterface for &mut T {
    fn write(&mut self, message: &str) {
        (**self).write(message)
    }

    fn read(&mut self) -> Option<String> {
        (**self).read()
    }
}

impl<T: UserInterface + ?Sized> UserInterface for Box<T> {
    fn write(&mut self, message: &str) {
        (**self).write(message)
    }

    fn read(&mut self) -> Option<String> {
        (**self).read()
    }
}

/// In-memory interface: answers reads from a queue and records writes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedUi {
    inputs: VecDeque<String>,
    outputs: Vec<String>,
}

impl ScriptedUi {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: Vec::new(),
        }
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Number of written lines containing `fragment`.
    pub fn count_containing(&self, fragment: &str) -> usize {
        self.outputs.iter().filter(|line| line.contains(fragment)).count()
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.count_containing(fragment) > 0
    }
}

impl UserInterface for ScriptedUi {
    fn write(&mut self, message: &str) {
        self.outputs.push(message.to_string());
    }

    fn read(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }
}

/// Renders an amount as dollars and cents, e.g. `$12.50` or `-$0.10`.
pub fn format_currency(amount: Decimal) -> String {
    let cents = amount.round_dp(2);
    if cents.is_sign_negative() && !cents.is_zero() {
        format!("-${:.2}", cents.abs())
    } else {
        format!("${:.2}", cents.abs())
    }
}
