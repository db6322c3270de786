//! Notification value object.

/// Visible lifetime of a notification after emission.
pub const NOTIFICATION_LIFETIME_MS: i64 = 3_000;

/// Ephemeral, user-facing message. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    /// Display color reference, usually the originating track color.
    pub color_hint: String,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}

impl Notification {
    pub fn new(
        message: impl Into<String>,
        color_hint: impl Into<String>,
        created_at_ms: i64,
    ) -> Self {
        Self {
            message: message.into(),
            color_hint: color_hint.into(),
            created_at_ms,
        }
    }
}
