//! Wire types returned by schedule sources.
//!
//! [`RawAppointment`] mirrors the JSON the booking backend sends for a day
//! query. The timestamp is kept as text until normalization so a single bad
//! entry can be skipped without failing the whole day.

use serde::{Deserialize, Serialize};

/// The client who booked an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawClient {
    /// Display name.
    pub name: String,
    /// Avatar URL; the backend sends `null` when the client has none.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// An appointment as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAppointment {
    /// Opaque identifier.
    pub id: String,
    /// ISO-8601 timestamp.
    pub date: String,
    /// The booking client.
    pub user: RawClient,
}

impl RawAppointment {
    /// Creates a raw appointment without avatar.
    pub fn new(id: impl Into<String>, date: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            user: RawClient {
                name: client_name.into(),
                avatar_url: None,
            },
        }
    }

    /// Builder method to set the avatar URL.
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.user.avatar_url = Some(url.into());
        self
    }
}
