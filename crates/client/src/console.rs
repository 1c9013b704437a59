//! Line-oriented console over a [`WithdrawPanel`].
//!
//! Each input line is one [`Command`]. The console renders the panel after
//! every edit and prints a progress line before awaiting a transfer.

use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use withdraw_core::{Address, ItemId, display_amount};
use withdraw_runtime::{PanelError, PanelView, SubmissionOutcome, SubmissionPhase, WithdrawPanel};

const HELP: &str = "\
commands:
  open               open the withdraw panel
  close              close the panel (an in-flight transfer keeps running)
  show               print the panel
  add <item>         stage one unit of an item
  remove <item>      unstage one unit of an item
  tokens <amount>    set the token amount to withdraw
  to <address>       set the destination address
  submit             send the withdrawal
  retry              resend a failed withdrawal
  ack                acknowledge the result and start over
  help               print this message
  quit               exit";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
enum Verb {
    Open,
    Close,
    Show,
    Add,
    Remove,
    Tokens,
    To,
    Submit,
    Retry,
    #[strum(serialize = "ack", serialize = "acknowledge")]
    Ack,
    Help,
    Quit,
}

/// One parsed console line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Show,
    Add(ItemId),
    Remove(ItemId),
    Tokens(Decimal),
    To(Address),
    Submit,
    Retry,
    Acknowledge,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownVerb(String),

    #[error("`{0}` expects an argument")]
    MissingArgument(String),

    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default();
        let verb =
            Verb::from_str(head).map_err(|_| CommandError::UnknownVerb(head.to_owned()))?;
        let mut argument = || {
            words
                .next()
                .ok_or_else(|| CommandError::MissingArgument(verb.to_string()))
        };

        let command = match verb {
            Verb::Open => Command::Open,
            Verb::Close => Command::Close,
            Verb::Show => Command::Show,
            Verb::Add => Command::Add(ItemId::from(argument()?)),
            Verb::Remove => Command::Remove(ItemId::from(argument()?)),
            Verb::Tokens => {
                let raw = argument()?;
                let amount = Decimal::from_str(raw)
                    .map_err(|_| CommandError::InvalidAmount(raw.to_owned()))?;
                Command::Tokens(amount)
            }
            Verb::To => Command::To(Address::from(argument()?)),
            Verb::Submit => Command::Submit,
            Verb::Retry => Command::Retry,
            Verb::Ack => Command::Acknowledge,
            Verb::Help => Command::Help,
            Verb::Quit => Command::Quit,
        };
        Ok(command)
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run(&mut self, panel: &mut WithdrawPanel) -> Result<()> {
        writeln!(self.output, "withdraw console, type `help` for commands")?;
        self.render(panel)?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let command = match Command::from_str(trimmed) {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };
            tracing::debug!(?command, "console command");

            if let Flow::Quit = self.execute(panel, command).await? {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    async fn execute(&mut self, panel: &mut WithdrawPanel, command: Command) -> Result<Flow> {
        match command {
            Command::Open => {
                if !panel.set_open(true) {
                    writeln!(self.output, "panel already open")?;
                }
                self.render(panel)?;
            }
            Command::Close => {
                if panel.set_open(false) {
                    writeln!(self.output, "panel closed")?;
                } else {
                    writeln!(self.output, "panel already closed")?;
                }
            }
            Command::Show => self.render(panel)?,
            Command::Add(item) => match panel.add(&item) {
                Ok(true) => self.render(panel)?,
                Ok(false) => writeln!(self.output, "no whole unit of {item} left to add")?,
                Err(err) => self.report(&err)?,
            },
            Command::Remove(item) => match panel.remove(&item) {
                Ok(true) => self.render(panel)?,
                Ok(false) => writeln!(self.output, "{item} is not in the basket")?,
                Err(err) => self.report(&err)?,
            },
            Command::Tokens(amount) => match panel.set_token_amount(amount) {
                Ok(()) => self.render(panel)?,
                Err(err) => self.report(&err)?,
            },
            Command::To(address) => match panel.set_destination(address) {
                Ok(()) => self.render(panel)?,
                Err(err) => self.report(&err)?,
            },
            Command::Submit => {
                self.announce(panel, SubmissionPhase::Input)?;
                let settled = panel.submit().await;
                self.settled(settled)?;
            }
            Command::Retry => {
                self.announce(panel, SubmissionPhase::Failed)?;
                let settled = panel.retry().await;
                self.settled(settled)?;
            }
            Command::Acknowledge => match panel.acknowledge() {
                Ok(_) => self.render(panel)?,
                Err(err) => self.report(&err)?,
            },
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Prints the progress line when the panel is about to start a transfer.
    fn announce(&mut self, panel: &WithdrawPanel, from: SubmissionPhase) -> Result<()> {
        if panel.view().is_ok_and(|view| view.phase() == from) {
            writeln!(self.output, "Withdrawing...")?;
        }
        Ok(())
    }

    fn settled(&mut self, settled: Result<SubmissionOutcome, PanelError>) -> Result<()> {
        match settled {
            Ok(SubmissionOutcome::Succeeded) => {
                writeln!(self.output, "Withdrawal complete. `ack` to continue.")?;
            }
            Ok(SubmissionOutcome::Failed(reason)) => {
                writeln!(self.output, "Withdrawal failed: {reason}. `retry` or `ack`.")?;
            }
            Ok(outcome) => writeln!(self.output, "submission is {}", outcome.phase())?,
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn report(&mut self, err: &PanelError) -> Result<()> {
        tracing::debug!(%err, "console command rejected");
        writeln!(self.output, "error: {err}")?;
        Ok(())
    }

    fn render(&mut self, panel: &WithdrawPanel) -> Result<()> {
        match panel.view() {
            Ok(view) => self.render_view(&view),
            Err(_) => {
                writeln!(self.output, "panel is closed (`open` to start)")?;
                Ok(())
            }
        }
    }

    fn render_view(&mut self, view: &PanelView) -> Result<()> {
        let out = &mut self.output;
        let basket = &view.basket;

        writeln!(out, "phase: {}", view.phase())?;
        if let Some(reason) = view.outcome.failure() {
            writeln!(out, "last failure: {reason}")?;
        }

        let selectable = basket.selectable();
        writeln!(out, "available:")?;
        for (item, remaining) in basket.remaining_view() {
            let marker = if selectable.contains(&item) { "" } else { " (none left)" };
            writeln!(out, "  {item:<12} {}{marker}", display_amount(remaining))?;
        }

        writeln!(out, "basket:")?;
        if basket.entries().is_empty() {
            writeln!(out, "  (empty)")?;
        }
        for entry in basket.entries() {
            writeln!(out, "  {:<12} x{}", entry.item, entry.quantity)?;
        }

        writeln!(out, "tokens: {}", basket.token_amount_display())?;
        writeln!(out, "to: {}", basket.destination())?;
        Ok(())
    }
}
