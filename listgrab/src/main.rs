use commands::command_argument_builder;
use listgrab::handlers::{handle_presets, handle_scrape, handle_validate, init_tracing};

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    init_tracing(chosen_command.get_count("verbose"));

    match chosen_command.subcommand() {
        Some(("scrape", primary_command)) => handle_scrape(primary_command).await,
        Some(("validate", primary_command)) => handle_validate(primary_command),
        Some(("presets", _)) => handle_presets(),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
