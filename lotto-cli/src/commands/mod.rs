pub mod draw;
pub mod ticket;
pub mod user;

pub use draw::{handle_draw_command, DrawCommands};
pub use ticket::{handle_ticket_command, TicketCommands};
pub use user::{handle_user_command, UserCommands};
