use std::fmt;

use serde::Serialize;

/// Text Rugplay puts in the body when the recipient does not exist,
/// sometimes without a 404 status.
pub const RECIPIENT_NOT_FOUND_MARKER: &str = "Recipient not found";

/// A single coin transfer, built fresh for each claim
#[derive(Clone)]
pub struct TransferRequest {
    pub credential: String,
    pub recipient_username: String,
    pub amount: u32,
    pub asset_symbol: String,
}

impl TransferRequest {
    pub fn new(credential: &str, recipient_username: &str, amount: u32, asset_symbol: &str) -> Self {
        Self {
            credential: credential.to_string(),
            recipient_username: recipient_username.to_string(),
            amount,
            asset_symbol: asset_symbol.to_uppercase(),
        }
    }

    /// JSON body for POST /api/transfer
    pub fn body(&self) -> TransferBody<'_> {
        TransferBody {
            recipient_username: &self.recipient_username,
            kind: "COIN",
            amount: self.amount,
            coin_symbol: &self.asset_symbol,
        }
    }
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("credential", &"<redacted>")
            .field("recipient_username", &self.recipient_username)
            .field("amount", &self.amount)
            .field("asset_symbol", &self.asset_symbol)
            .finish()
    }
}

/// Request body for the transfer endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody<'a> {
    pub recipient_username: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub amount: u32,
    pub coin_symbol: &'a str,
}

/// Classified result of a relayed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success {
        amount: u32,
        symbol: String,
        recipient: String,
    },
    RecipientNotFound {
        recipient: String,
    },
    /// Any status other than 200/404; body kept verbatim
    RemoteError {
        status_code: u16,
        body: String,
    },
    /// The request never got a response (timeout, DNS, refused, bad header)
    TransportError {
        reason: String,
    },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_matches_wire_format() {
        let req = TransferRequest::new("sid=abc", "alice", 42, "usd");
        let json = serde_json::to_value(req.body()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "recipientUsername": "alice",
                "type": "COIN",
                "amount": 42,
                "coinSymbol": "USD",
            })
        );
    }

    #[test]
    fn test_debug_redacts_credential() {
        let req = TransferRequest::new("sid=abc", "alice", 42, "usd");
        assert!(!format!("{:?}", req).contains("sid=abc"));
    }
}
