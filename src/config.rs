//! Configuration for the urban assistant
//!
//! Every section has defaults, so an empty TOML file (or no file at all)
//! yields the stock keyword tables and destinations. A file only needs to
//! carry what it overrides.

use crate::routing::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use warp::http::Uri;

/// Locations searched, in order, when no config path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["assistant.toml", "config/assistant.toml"];

/// Main assistant configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub intents: IntentSection,
    /// Navigation destinations, evaluated in declaration order
    #[serde(default = "default_destinations")]
    pub destinations: Vec<DestinationEntry>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            defaults: DefaultsSection::default(),
            intents: IntentSection::default(),
            destinations: default_destinations(),
        }
    }
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Interface address to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
    /// CORS origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerSection {
    /// Resolve host and port into a bindable address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::InvalidConfig(format!(
                "server.host '{}' is not an IP address",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> u64 {
    16 * 1024
}

/// Values applied when a request omits role or scope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsSection {
    #[serde(default)]
    pub role: Role,
    /// City instance used to build navigation paths
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            role: Role::default(),
            scope: default_scope(),
        }
    }
}

fn default_scope() -> String {
    "demo-city".to_string()
}

/// Keyword tables driving intent detection.
///
/// Matching is a case-insensitive substring test against the normalized
/// query, so `apartment` also catches `apartments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentSection {
    #[serde(default = "default_housing_keywords")]
    pub housing_keywords: Vec<String>,
    #[serde(default = "default_traffic_keywords")]
    pub traffic_keywords: Vec<String>,
    #[serde(default = "default_parking_keywords")]
    pub parking_keywords: Vec<String>,
    #[serde(default = "default_events_keywords")]
    pub events_keywords: Vec<String>,
    #[serde(default = "default_food_keywords")]
    pub food_keywords: Vec<String>,
    #[serde(default = "default_navigation_phrases")]
    pub navigation_phrases: Vec<String>,
    /// Areas recognized by the housing intent, first match wins
    #[serde(default = "default_areas")]
    pub areas: Vec<AreaEntry>,
}

impl Default for IntentSection {
    fn default() -> Self {
        Self {
            housing_keywords: default_housing_keywords(),
            traffic_keywords: default_traffic_keywords(),
            parking_keywords: default_parking_keywords(),
            events_keywords: default_events_keywords(),
            food_keywords: default_food_keywords(),
            navigation_phrases: default_navigation_phrases(),
            areas: default_areas(),
        }
    }
}

/// A neighbourhood the housing intent can filter on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaEntry {
    /// Phrase as users type it, e.g. `area y`
    pub phrase: String,
    /// Filter value sent to the living view, e.g. `area-y`
    pub slug: String,
    /// Display name used in messages
    pub label: String,
}

impl AreaEntry {
    fn new(phrase: &str, slug: &str, label: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            slug: slug.to_string(),
            label: label.to_string(),
        }
    }
}

/// A page the navigation intent can send the user to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DestinationEntry {
    pub keyword: String,
    /// Absolute when it starts with `/`, otherwise a view under `/urban/{scope}/`
    pub path: String,
}

impl DestinationEntry {
    pub fn new(keyword: &str, path: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            path: path.to_string(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_housing_keywords() -> Vec<String> {
    strings(&["apartment", "housing", "condo", "loft"])
}

fn default_traffic_keywords() -> Vec<String> {
    strings(&["traffic", "congestion", "road condition"])
}

fn default_parking_keywords() -> Vec<String> {
    strings(&["parking"])
}

fn default_events_keywords() -> Vec<String> {
    strings(&["events", "happening"])
}

fn default_food_keywords() -> Vec<String> {
    strings(&["restaurant", "food", "dining", "cuisine"])
}

fn default_navigation_phrases() -> Vec<String> {
    strings(&["go to", "navigate to", "take me to"])
}

fn default_areas() -> Vec<AreaEntry> {
    vec![
        AreaEntry::new("area y", "area-y", "Area Y"),
        AreaEntry::new("area z", "area-z", "Area Z"),
        AreaEntry::new("area x", "area-x", "Area X"),
        AreaEntry::new("downtown", "downtown", "Downtown"),
        AreaEntry::new("tech quarter", "tech-quarter", "Tech Quarter"),
        AreaEntry::new("green district", "green-district", "Green District"),
    ]
}

/// Stock destination table. Order is the tie-break when a query names
/// several destinations.
pub fn default_destinations() -> Vec<DestinationEntry> {
    vec![
        DestinationEntry::new("dashboard", "dashboard"),
        DestinationEntry::new("living", "living"),
        DestinationEntry::new("events", "event"),
        DestinationEntry::new("food", "food"),
        DestinationEntry::new("entertainment", "entertainment"),
        DestinationEntry::new("health", "health"),
        DestinationEntry::new("sport", "sport"),
        DestinationEntry::new("community", "community"),
        DestinationEntry::new("wellness", "reflexing"),
        DestinationEntry::new("networks", "/networks"),
    ]
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AssistantConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AssistantConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, else the first default location that
    /// exists, else built-in defaults. Returns the path actually used.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = PathBuf::from(candidate);
            if path.exists() {
                let config = Self::load_from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_scope(&self.defaults.scope)?;
        self.server.socket_addr()?;

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::InvalidConfig(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }

        for origin in &self.server.allowed_origins {
            validate_origin(origin)?;
        }

        let intents = &self.intents;
        for (name, keywords) in [
            ("housing_keywords", &intents.housing_keywords),
            ("traffic_keywords", &intents.traffic_keywords),
            ("parking_keywords", &intents.parking_keywords),
            ("events_keywords", &intents.events_keywords),
            ("food_keywords", &intents.food_keywords),
            ("navigation_phrases", &intents.navigation_phrases),
        ] {
            validate_keywords(name, keywords)?;
        }

        if intents.areas.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "intents.areas must contain at least one area".to_string(),
            ));
        }
        for area in &intents.areas {
            if area.phrase.trim().is_empty() || area.slug.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "area '{}' needs a non-empty phrase and slug",
                    area.label
                )));
            }
        }

        let mut seen = HashSet::new();
        for destination in &self.destinations {
            let keyword = destination.keyword.trim().to_lowercase();
            if keyword.is_empty() || destination.path.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "destinations need a non-empty keyword and path".to_string(),
                ));
            }
            if !seen.insert(keyword) {
                return Err(ConfigError::InvalidConfig(format!(
                    "duplicate destination keyword '{}'",
                    destination.keyword
                )));
            }
        }

        Ok(())
    }
}

fn validate_keywords(name: &str, keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.is_empty() {
        return Err(ConfigError::InvalidConfig(format!(
            "intents.{name} must contain at least one keyword"
        )));
    }
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::InvalidConfig(format!(
            "intents.{name} contains a blank keyword"
        )));
    }
    Ok(())
}

/// CORS origins are `scheme://host[:port]` with no path, query or fragment.
///
/// Parsed the same way the CORS filter parses them, so anything accepted
/// here cannot make the filter panic at startup.
fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let invalid = || {
        ConfigError::InvalidConfig(format!(
            "server.allowed_origins entry '{origin}' must look like https://host[:port]"
        ))
    };

    if origin.contains(['#', '@']) {
        return Err(invalid());
    }

    let parts = origin.parse::<Uri>().map_err(|_| invalid())?.into_parts();
    let path_ok = parts
        .path_and_query
        .as_ref()
        .map_or(true, |path| path == "/");

    match (parts.scheme, parts.authority) {
        (Some(scheme), Some(authority))
            if path_ok
                && matches!(scheme.as_str(), "http" | "https")
                && !authority.host().is_empty()
                && (authority.port_u16().is_some() || authority.as_str() == authority.host()) =>
        {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

/// Default scope must be usable as a single path segment
fn validate_scope(scope: &str) -> Result<(), ConfigError> {
    let valid_chars = scope
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if scope.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidScope(format!(
            "Scope '{scope}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
