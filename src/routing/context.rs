//! Caller-supplied routing context

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is asking. Developers get analysis views, everyone else the
/// general-purpose ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    #[default]
    User,
}

impl Role {
    /// Lenient parse used for request fields: anything other than
    /// `developer` (ignoring case and surrounding whitespace) is a user.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("developer") {
            Role::Developer
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request context. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingContext {
    pub role: Role,
    /// Opaque city instance identifier, spliced into navigation paths
    pub scope: String,
}

impl RoutingContext {
    pub fn new<S: Into<String>>(role: Role, scope: S) -> Self {
        Self {
            role,
            scope: scope.into(),
        }
    }

    /// Path of a view inside this city instance
    pub fn view_path(&self, view: &str) -> String {
        format!("/urban/{}/{}", self.scope, view)
    }
}
