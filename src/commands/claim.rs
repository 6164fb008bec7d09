use serenity::all::{CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption};

use super::string_option;
use crate::models::ClaimRequest;
use crate::services::{Dispatcher, Reply};

pub fn register() -> CreateCommand {
    CreateCommand::new("claim")
        .description("Claim a Rugplay coin to a username.")
        .dm_permission(false)
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "username", "Rugplay username")
                .required(true)
                .max_length(64),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "coin", "Coin symbol, e.g. USD")
                .required(true)
                .max_length(16),
        )
}

pub async fn execute(command: &CommandInteraction, dispatcher: &Dispatcher) -> Reply {
    let Some(guild_id) = command.guild_id else {
        return Reply::guild_only();
    };

    match ClaimRequest::new(
        guild_id.to_string(),
        string_option(command, "username"),
        string_option(command, "coin"),
    ) {
        Ok(request) => dispatcher.claim_reply(&request).await,
        Err(e) => Reply::invalid_input(&e),
    }
}
