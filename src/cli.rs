//! CLI domain: parse, route, output, and presentation only.
//! No seeding logic here; the route table dispatches to the node and seeder.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, PinCommands};
pub use route::RunContext;
