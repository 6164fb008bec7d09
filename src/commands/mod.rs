pub mod claim;
pub mod register_cookie;

use serenity::all::{
    CommandDataOptionValue, CommandInteraction, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditInteractionResponse,
};
use serenity::prelude::Context;
use tracing::{debug, error, warn};

use crate::services::{Dispatcher, Reply};

/// Slash commands registered with Discord on start-up
pub fn create_commands() -> Vec<CreateCommand> {
    vec![claim::register(), register_cookie::register()]
}

pub async fn handle_interaction(ctx: &Context, command: &CommandInteraction, dispatcher: &Dispatcher) {
    debug!(
        "/{} from user {} in guild {:?}",
        command.data.name, command.user.id, command.guild_id
    );

    match command.data.name.as_str() {
        "claim" => {
            // Rugplay can take longer than Discord's 3 second response window
            if let Err(e) = command.defer_ephemeral(&ctx.http).await {
                error!("Failed to defer /claim: {}", e);
                return;
            }
            let reply = claim::execute(command, dispatcher).await;
            send_deferred(ctx, command, &reply).await;
        }
        "register_cookie" => {
            let reply = register_cookie::execute(ctx, command, dispatcher).await;
            respond(ctx, command, &reply).await;
        }
        other => warn!("Unknown command: {}", other),
    }
}

/// Value of a string option, empty when missing
pub(crate) fn string_option<'a>(command: &'a CommandInteraction, name: &str) -> &'a str {
    command
        .data
        .options
        .iter()
        .find(|o| o.name == name)
        .and_then(|o| match &o.value {
            CommandDataOptionValue::String(s) => Some(s.as_str()),
            _ => None,
        })
        .unwrap_or_default()
}

async fn respond(ctx: &Context, command: &CommandInteraction, reply: &Reply) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(reply.embed())
            .ephemeral(reply.ephemeral),
    );

    if let Err(e) = command.create_response(&ctx.http, response).await {
        error!("Failed to respond to /{}: {}", command.data.name, e);
    }
}

/// Finish a deferred (ephemeral) interaction.
/// Public replies go to the channel and the private placeholder is removed.
async fn send_deferred(ctx: &Context, command: &CommandInteraction, reply: &Reply) {
    if !reply.ephemeral {
        match command
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(reply.embed()))
            .await
        {
            Ok(_) => {
                if let Err(e) = command.delete_response(&ctx.http).await {
                    debug!("Could not remove deferred response: {}", e);
                }
                return;
            }
            Err(e) => warn!("Could not post public reply, answering privately: {}", e),
        }
    }

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(reply.embed()))
        .await
    {
        error!("Failed to edit deferred /{}: {}", command.data.name, e);
    }
}
