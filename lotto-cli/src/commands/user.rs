use comfy_table::{presets::UTF8_FULL, Table};
use clap::Subcommand;
use lotto_draw::{LottoManager, Result};

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Username
        name: String,
    },
    /// List registered users
    List,
}

pub async fn handle_user_command(cmd: UserCommands, manager: &LottoManager) -> Result<()> {
    match cmd {
        UserCommands::Register { name } => {
            let user = manager.register_user(&name).await?;
            println!("User '{}' registered.", user.username);
            println!("  ID: {}", user.id);
        }

        UserCommands::List => {
            let users = manager.users().await?;

            if users.is_empty() {
                println!("No users found.");
                println!("Register one with: lotto user register <name>");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Username", "ID", "Registered"]);

            for user in users {
                table.add_row(vec![
                    user.username,
                    user.id,
                    user.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }

            println!("{}", table);
        }
    }

    Ok(())
}
