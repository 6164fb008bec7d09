//! Admin listing models

use chrono::{DateTime, Utc};

/// A registered guild as shown on the admin dashboard.
/// The credential itself is never part of this view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEntry {
    pub guild_id: String,
    pub registered_at: DateTime<Utc>,
}
