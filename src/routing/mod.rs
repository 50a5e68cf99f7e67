//! Intent routing
//!
//! A stateless classifier that turns a free-text query into a navigation
//! or info response. Rules are evaluated in a fixed priority order:
//!
//! 1. housing (housing keyword and a known area)
//! 2. traffic
//! 3. parking
//! 4. events
//! 5. food
//! 6. explicit navigation ("go to ...")
//! 7. help, when nothing else answers
//!
//! Keyword and destination tables come from configuration; response copy
//! is parameterized by the static [`catalog::CityCatalog`].

pub mod catalog;
pub mod context;
pub mod destinations;
pub mod query;
pub mod result;
pub mod router;
pub mod rules;

pub use catalog::CityCatalog;
pub use context::{Role, RoutingContext};
pub use destinations::{DestinationPath, DestinationTable};
pub use query::{KeywordSet, NormalizedQuery};
pub use result::{Action, ActionKind, RoutingResult};
pub use router::{IntentRouter, RouteOutcome};
pub use rules::{Intent, IntentRule, RoleResponse, RoleVariants, HELP_MESSAGE};
