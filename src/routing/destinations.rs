//! Navigation destination table

use super::context::RoutingContext;
use super::query::NormalizedQuery;
use crate::config::{default_destinations, DestinationEntry};

/// Where a destination points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationPath {
    /// View inside the caller's city instance, resolved as `/urban/{scope}/{view}`
    View(String),
    /// Fixed path, independent of scope
    Absolute(String),
}

impl DestinationPath {
    fn parse(path: &str) -> Self {
        let path = path.trim();
        if path.starts_with('/') {
            DestinationPath::Absolute(path.to_string())
        } else {
            DestinationPath::View(path.to_string())
        }
    }

    pub fn resolve(&self, ctx: &RoutingContext) -> String {
        match self {
            DestinationPath::View(view) => ctx.view_path(view),
            DestinationPath::Absolute(path) => path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub keyword: String,
    pub path: DestinationPath,
}

/// Ordered keyword → path mapping. Lookup returns the first entry whose
/// keyword occurs in the text, so declaration order breaks ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTable {
    entries: Vec<Destination>,
}

impl DestinationTable {
    pub fn from_entries(entries: &[DestinationEntry]) -> Self {
        let entries = entries
            .iter()
            .filter_map(|entry| {
                NormalizedQuery::parse(&entry.keyword).map(|keyword| Destination {
                    keyword: keyword.as_str().to_string(),
                    path: DestinationPath::parse(&entry.path),
                })
            })
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, text: &str) -> Option<&Destination> {
        self.entries
            .iter()
            .find(|destination| text.contains(destination.keyword.as_str()))
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DestinationTable {
    fn default() -> Self {
        Self::from_entries(&default_destinations())
    }
}
