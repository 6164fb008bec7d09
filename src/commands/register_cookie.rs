use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, GuildId, UserId,
};
use serenity::prelude::Context;
use tracing::{debug, error};

use super::string_option;
use crate::models::RegisterCredentialRequest;
use crate::services::{Dispatcher, Reply};

pub fn register() -> CreateCommand {
    CreateCommand::new("register_cookie")
        .description("Register your Rugplay session cookie (server owner only)")
        .dm_permission(false)
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "cookie", "Rugplay session cookie")
                .required(true),
        )
}

/// Owner from the cache when we have the guild, otherwise over HTTP
async fn guild_owner(ctx: &Context, guild_id: GuildId) -> Result<UserId, String> {
    if let Some(owner_id) = guild_id.to_guild_cached(&ctx.cache).map(|g| g.owner_id) {
        return Ok(owner_id);
    }

    debug!("Guild {} not in cache, fetching from API", guild_id);
    let guild = guild_id
        .to_partial_guild(&ctx.http)
        .await
        .map_err(|e| format!("Failed to get guild: {}", e))?;

    Ok(guild.owner_id)
}

pub async fn execute(ctx: &Context, command: &CommandInteraction, dispatcher: &Dispatcher) -> Reply {
    let Some(guild_id) = command.guild_id else {
        return Reply::guild_only();
    };

    let owner_id = match guild_owner(ctx, guild_id).await {
        Ok(id) => id,
        Err(e) => {
            error!("{}", e);
            return Reply::failure();
        }
    };

    match RegisterCredentialRequest::new(
        guild_id.to_string(),
        command.user.id.get(),
        owner_id.get(),
        string_option(command, "cookie"),
    ) {
        Ok(request) => dispatcher.register_credential_reply(&request).await,
        Err(e) => Reply::invalid_input(&e),
    }
}
