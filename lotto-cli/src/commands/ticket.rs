use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use lotto_core::Ticket;
use lotto_draw::{LottoManager, Result};

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Buy tickets: hand-picked with --numbers, quick picks otherwise
    Buy {
        /// Username
        user: String,
        /// Six comma separated numbers, e.g. 1,5,12,20,33,42
        #[arg(short, long)]
        numbers: Option<String>,
        /// Number of quick-pick tickets
        #[arg(short, long, default_value_t = 1, conflicts_with = "numbers")]
        count: u32,
    },
    /// List a user's tickets
    List {
        /// Username
        user: String,
    },
    /// Show a ticket and how it fares against the active draw
    Show {
        /// Ticket ID
        id: String,
    },
}

pub async fn handle_ticket_command(cmd: TicketCommands, manager: &LottoManager) -> Result<()> {
    match cmd {
        TicketCommands::Buy {
            user,
            numbers,
            count,
        } => {
            let tickets = match numbers {
                Some(numbers) => vec![manager.office().buy_manual(&user, &numbers).await?],
                None => manager.office().buy_auto(&user, count).await?,
            };

            println!("Bought {} ticket(s) for '{}':", tickets.len(), user);
            println!("{}", ticket_table(&tickets));
        }

        TicketCommands::List { user } => {
            let tickets = manager.office().tickets_for(&user).await?;

            if tickets.is_empty() {
                println!("'{}' has no tickets.", user);
                println!("Buy one with: lotto ticket buy {}", user);
                return Ok(());
            }

            println!("Tickets for '{}':", user);
            println!("{}", ticket_table(&tickets));
        }

        TicketCommands::Show { id } => {
            let check = manager.office().check_ticket(&id).await?;
            let ticket = &check.ticket;

            println!("Ticket {}", ticket.id);
            println!("  Numbers: {}", ticket.numbers);
            println!("  Origin: {:?}", ticket.origin);
            println!("  Bought: {}", ticket.created_at.format("%Y-%m-%d %H:%M"));

            match ticket.draw_id {
                Some(ref draw_id) => println!("  Settled: {} (draw {})", ticket.tier, draw_id),
                None => println!("  Settled: not yet"),
            }

            match (&check.active_draw, check.tier) {
                (Some(draw), Some(tier)) => {
                    println!();
                    println!("Active draw: {}", draw.numbers);
                    if let Some(bonus) = draw.bonus {
                        println!("  Bonus: {}", bonus);
                    }
                    println!("  Matched: {}", ticket.numbers.matches(&draw.numbers));
                    println!("  Result: {}", tier);
                }
                _ => println!("No draw has been published yet."),
            }
        }
    }

    Ok(())
}

pub fn ticket_table(tickets: &[Ticket]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Numbers", "Origin", "Bought", "Result"]);

    for ticket in tickets {
        let result = if ticket.is_settled() {
            ticket.tier.to_string()
        } else {
            "pending".to_string()
        };

        table.add_row(vec![
            ticket.id.clone(),
            ticket.numbers.to_string(),
            format!("{:?}", ticket.origin),
            ticket.created_at.format("%Y-%m-%d %H:%M").to_string(),
            result,
        ]);
    }

    table
}
