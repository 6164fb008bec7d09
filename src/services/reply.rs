use serenity::builder::CreateEmbed;

use crate::api::rugplay::TransferOutcome;
use crate::models::ValidationError;
use crate::utils::truncate;

use super::DispatchError;

const COLOR_SUCCESS: u32 = 0x00ff00;
const COLOR_ERROR: u32 = 0xff3333;
const COLOR_WARNING: u32 = 0xffa500;

/// Longest slice of a Rugplay error body echoed back to Discord
const MAX_BODY_CHARS: usize = 1000;

/// What goes back to the invoker and who else gets to see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// Only the invoker can see ephemeral replies
    pub ephemeral: bool,
}

impl Reply {
    fn public(title: &str, description: String, color: u32) -> Self {
        Self {
            title: title.to_string(),
            description,
            color,
            ephemeral: false,
        }
    }

    fn private(title: &str, description: String, color: u32) -> Self {
        Self {
            title: title.to_string(),
            description,
            color,
            ephemeral: true,
        }
    }

    /// Transfers are announced publicly, every failure stays with the invoker
    pub fn for_claim(outcome: &TransferOutcome) -> Self {
        match outcome {
            TransferOutcome::Success { amount, symbol, recipient } => Self::public(
                "✅ Coins Sent",
                format!("Sent **{} {}** to **{}**!", amount, symbol, recipient),
                COLOR_SUCCESS,
            ),
            TransferOutcome::RecipientNotFound { recipient } => Self::private(
                "❌ Recipient Not Found",
                format!("User **{}** not found on Rugplay.", recipient),
                COLOR_ERROR,
            ),
            TransferOutcome::RemoteError { status_code, body } => Self::private(
                "❌ Transfer Failed",
                format!(
                    "Failed to send coin: `{}`\n{}",
                    status_code,
                    truncate(body, MAX_BODY_CHARS)
                ),
                COLOR_ERROR,
            ),
            TransferOutcome::TransportError { .. } => Self::private(
                "⚠️ Network Error",
                "Could not reach Rugplay. Please try again later.".to_string(),
                COLOR_WARNING,
            ),
        }
    }

    pub fn registered() -> Self {
        Self::private(
            "✅ Cookie Registered",
            "Cookie registered successfully!".to_string(),
            COLOR_SUCCESS,
        )
    }

    pub fn for_error(error: &DispatchError) -> Self {
        match error {
            DispatchError::Unauthorized => Self::private(
                "🚫 Not Authorized",
                "Only the server owner can register the cookie.".to_string(),
                COLOR_ERROR,
            ),
            DispatchError::NoCredentialAvailable => Self::private(
                "❌ No Cookie",
                "No Rugplay cookie available. Please register one using `/register_cookie`."
                    .to_string(),
                COLOR_ERROR,
            ),
            DispatchError::InvalidInput(e) => Self::invalid_input(e),
            DispatchError::Storage(_) => Self::failure(),
        }
    }

    pub fn invalid_input(error: &ValidationError) -> Self {
        Self::private("❌ Invalid Input", error.to_string(), COLOR_ERROR)
    }

    pub fn guild_only() -> Self {
        Self::private(
            "❌ Guild Only",
            "This command can only be used in a server.".to_string(),
            COLOR_ERROR,
        )
    }

    pub fn failure() -> Self {
        Self::private(
            "❌ Command Error",
            "An error occurred while executing the command.".to_string(),
            COLOR_ERROR,
        )
    }

    pub fn embed(&self) -> CreateEmbed {
        CreateEmbed::default()
            .title(&self.title)
            .description(&self.description)
            .color(self.color)
    }
}
