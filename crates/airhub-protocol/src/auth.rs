//! OAuth token and scope types.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::time;

/// OAuth scopes understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Advisory query, create, update and delete.
    AdvisoryRead,
    /// Surface hexbin generation.
    SurfaceTier1,
    /// FAA aviation layers and airspace checks.
    AviationRead,
}

impl Scope {
    /// The scope string sent to the token endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::AdvisoryRead => "airhub-api/advisory.read",
            Scope::SurfaceTier1 => "airhub-api/surface.tier1",
            Scope::AviationRead => "airhub-api/aviation.read",
        }
    }

    /// Space-separated scope list, as the token endpoint expects.
    pub fn join(scopes: &[Scope]) -> String {
        scopes
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bearer token issued by the OAuth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "accessToken")]
    pub access_token: String,

    /// Expiry instant.
    #[serde(with = "time::required")]
    pub expires: DateTime<Utc>,

    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: String,
}

impl Token {
    /// Whether the token is non-empty and still usable `margin` after `now`.
    ///
    /// A margin that overflows the calendar counts as expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        !self.access_token.is_empty()
            && now
                .checked_add_signed(margin)
                .is_some_and(|deadline| deadline < self.expires)
    }

    /// Whether the token is usable right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now(), Duration::zero())
    }

    /// Granted scope strings.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }

    /// Whether every scope in `required` was granted.
    pub fn has_scopes(&self, required: &[Scope]) -> bool {
        required
            .iter()
            .all(|needed| self.scopes().any(|granted| granted == needed.as_str()))
    }
}
