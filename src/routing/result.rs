//! Routing result wire types
//!
//! A result serializes to one of three shapes:
//!
//! ```text
//! { "success": true,  "message": ..., "action": "navigate", "target": ..., "feature"?: ..., "filterParams"?: {...} }
//! { "success": true,  "message": ..., "action": "info", "data"?: {...} }
//! { "success": false, "message": ... }
//! ```
//!
//! `Action` is an internally tagged enum, so a navigate action without a
//! target cannot be constructed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// What the client should do with a successful result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Change views
    Navigate {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature: Option<String>,
        #[serde(
            default,
            rename = "filterParams",
            skip_serializing_if = "Option::is_none"
        )]
        filter_params: Option<BTreeMap<String, String>>,
    },
    /// Display the message, optionally with a data payload
    Info {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

/// Discriminator of [`Action`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Navigate,
    Info,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Info => "info",
        }
    }
}

/// Response produced by the intent router
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingResult {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub action: Option<Action>,
}

impl RoutingResult {
    /// Successful navigate result
    pub fn navigate<M: Into<String>, T: Into<String>>(message: M, target: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            action: Some(Action::Navigate {
                target: target.into(),
                feature: None,
                filter_params: None,
            }),
        }
    }

    /// Successful info result without payload
    pub fn info<M: Into<String>>(message: M) -> Self {
        Self {
            success: true,
            message: message.into(),
            action: Some(Action::Info { data: None }),
        }
    }

    /// Successful info result carrying a data payload
    pub fn info_with_data<M: Into<String>>(message: M, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            action: Some(Action::Info { data: Some(data) }),
        }
    }

    /// Failed result; carries no action
    pub fn rejected<M: Into<String>>(message: M) -> Self {
        Self {
            success: false,
            message: message.into(),
            action: None,
        }
    }

    /// Attach a feature hint to a navigate result. No-op for other actions.
    pub fn with_feature<F: Into<String>>(mut self, value: F) -> Self {
        if let Some(Action::Navigate { feature, .. }) = &mut self.action {
            *feature = Some(value.into());
        }
        self
    }

    /// Attach a filter parameter to a navigate result. No-op for other actions.
    pub fn with_filter<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        if let Some(Action::Navigate { filter_params, .. }) = &mut self.action {
            filter_params
                .get_or_insert_with(BTreeMap::new)
                .insert(key.into(), value.into());
        }
        self
    }

    pub fn action_kind(&self) -> Option<ActionKind> {
        match self.action {
            Some(Action::Navigate { .. }) => Some(ActionKind::Navigate),
            Some(Action::Info { .. }) => Some(ActionKind::Info),
            None => None,
        }
    }

    pub fn is_navigate(&self) -> bool {
        self.action_kind() == Some(ActionKind::Navigate)
    }

    pub fn is_info(&self) -> bool {
        self.action_kind() == Some(ActionKind::Info)
    }

    pub fn target(&self) -> Option<&str> {
        match &self.action {
            Some(Action::Navigate { target, .. }) => Some(target),
            _ => None,
        }
    }

    pub fn feature(&self) -> Option<&str> {
        match &self.action {
            Some(Action::Navigate { feature, .. }) => feature.as_deref(),
            _ => None,
        }
    }

    pub fn filter_params(&self) -> Option<&BTreeMap<String, String>> {
        match &self.action {
            Some(Action::Navigate { filter_params, .. }) => filter_params.as_ref(),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.action {
            Some(Action::Info { data }) => data.as_ref(),
            _ => None,
        }
    }
}
