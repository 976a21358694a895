use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;
use lotto_core::numbers::checked_number;
use lotto_core::{LottoError, NumberSet, Tier};
use lotto_draw::{LottoManager, Result, SettlementReport};
use std::collections::HashMap;

#[derive(Subcommand)]
pub enum DrawCommands {
    /// Publish a new draw and settle every ticket against it
    Publish {
        /// Winning numbers; drawn at random when omitted
        #[arg(short, long)]
        numbers: Option<String>,
        /// Bonus number for a hand-entered draw
        #[arg(short, long, requires = "numbers")]
        bonus: Option<i64>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the active draw
    Show,
    /// List every draw, newest first
    History,
    /// Correct the numbers of a stored draw and re-grade its tickets
    Correct {
        /// Draw ID
        id: String,
        /// Corrected winning numbers
        #[arg(short, long)]
        numbers: String,
        /// Corrected bonus number
        #[arg(short, long)]
        bonus: Option<i64>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List winning tickets of the active draw
    Winners,
}

pub async fn handle_draw_command(cmd: DrawCommands, manager: &LottoManager) -> Result<()> {
    match cmd {
        DrawCommands::Publish {
            numbers,
            bonus,
            yes,
        } => {
            let manual = match numbers {
                Some(numbers) => Some(parse_draw(&numbers, bonus)?),
                None => None,
            };

            if !yes
                && !confirm("Publishing a draw deactivates the current one and re-grades all tickets. Continue?")?
            {
                println!("Draw cancelled.");
                return Ok(());
            }

            let report = match manual {
                Some((numbers, bonus)) => {
                    manager.engine().publish_manual_draw(numbers, bonus).await?
                }
                None => manager.engine().publish_draw().await?,
            };

            println!("Draw published!");
            print_report(&report);
        }

        DrawCommands::Show => match manager.active_draw().await? {
            Some(draw) => {
                println!("Active draw {}", draw.id);
                println!("  Numbers: {}", draw.numbers);
                match draw.bonus {
                    Some(bonus) => println!("  Bonus: {}", bonus),
                    None => println!("  Bonus: none"),
                }
                println!("  Drawn: {}", draw.drawn_at.format("%Y-%m-%d %H:%M"));
            }
            None => {
                println!("No draw has been published yet.");
                println!("Run one with: lotto draw publish");
            }
        },

        DrawCommands::History => {
            let draws = manager.draw_history().await?;

            if draws.is_empty() {
                println!("No draws found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Numbers", "Bonus", "Drawn", "Active"]);

            for draw in draws {
                table.add_row(vec![
                    draw.id,
                    draw.numbers.to_string(),
                    draw.bonus.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string()),
                    draw.drawn_at.format("%Y-%m-%d %H:%M").to_string(),
                    if draw.is_active { "yes" } else { "" }.to_string(),
                ]);
            }

            println!("{}", table);
        }

        DrawCommands::Correct {
            id,
            numbers,
            bonus,
            yes,
        } => {
            let (numbers, bonus) = parse_draw(&numbers, bonus)?;

            if !yes && !confirm(&format!("Overwrite the numbers of draw {}?", id))? {
                println!("Correction cancelled.");
                return Ok(());
            }

            let report = manager.engine().correct_draw(&id, numbers, bonus).await?;
            println!("Draw corrected!");
            print_report(&report);
        }

        DrawCommands::Winners => {
            let (draw, winners) = manager.winners().await?;

            println!("Winners of draw {} ({})", draw.id, draw.numbers);
            if winners.is_empty() {
                println!("No winning tickets.");
                return Ok(());
            }

            let names: HashMap<String, String> = manager
                .users()
                .await?
                .into_iter()
                .map(|u| (u.id, u.username))
                .collect();

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Tier", "User", "Ticket", "Numbers"]);

            for ticket in winners {
                table.add_row(vec![
                    ticket.tier.to_string(),
                    names.get(&ticket.owner_id).cloned().unwrap_or_default(),
                    ticket.id,
                    ticket.numbers.to_string(),
                ]);
            }

            println!("{}", table);
        }
    }

    Ok(())
}

fn parse_draw(numbers: &str, bonus: Option<i64>) -> Result<(NumberSet, Option<u8>)> {
    let numbers: NumberSet = numbers.parse()?;
    let bonus = bonus.map(checked_number).transpose()?;
    Ok((numbers, bonus))
}

fn confirm(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(LottoError::from)?;
    Ok(confirmed)
}

fn print_report(report: &SettlementReport) {
    let draw = &report.draw;
    println!("  ID: {}", draw.id);
    println!("  Numbers: {}", draw.numbers);
    if let Some(bonus) = draw.bonus {
        println!("  Bonus: {}", bonus);
    }
    println!("  Tickets graded: {}", report.graded);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Tier", "Tickets"]);
    for tier in Tier::ALL {
        table.add_row(vec![tier.to_string(), report.count(tier).to_string()]);
    }
    println!("{}", table);
}
