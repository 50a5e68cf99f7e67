//! Intent rules
//!
//! Each rule is a predicate (`matches`) paired with a handler (`respond`).
//! The router walks rules in order and the first rule that matches and
//! produces a response wins. A rule may match and still decline, in which
//! case evaluation continues with the next rule.

use super::catalog::{CityCatalog, ParkingReport, TrafficReport};
use super::context::{Role, RoutingContext};
use super::destinations::DestinationTable;
use super::query::{KeywordSet, NormalizedQuery};
use super::result::RoutingResult;
use crate::config::{AreaEntry, DestinationEntry, IntentSection};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

const DASHBOARD_VIEW: &str = "dashboard";
const LIVING_VIEW: &str = "living";
const EVENTS_VIEW: &str = "event";
const FOOD_VIEW: &str = "food";

/// Words that can sit in front of a food keyword without naming a cuisine
const NOT_A_CUISINE: &[&str] = &[
    "a", "any", "best", "cheap", "find", "fine", "for", "good", "great", "local", "me", "nearby",
    "nice", "show", "some", "the",
];

/// Fallback text listing what the assistant understands
pub const HELP_MESSAGE: &str = "I'm your urban intelligence assistant! I can help you with:

🏠 **Housing**: \"apartments near area Y\", \"find housing\"
🚗 **Traffic**: \"traffic status\", \"road conditions\"
🅿️ **Parking**: \"parking availability\", \"find parking\"
📅 **Events**: \"upcoming events\", \"what's happening\"
🍽️ **Food**: \"restaurants near downtown\", \"japanese food\"
🎯 **Navigation**: \"go to dashboard\", \"show events page\"

I can also navigate you directly to different sections of the city system. What would you like to know about?";

/// Recognized request categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Housing,
    Traffic,
    Parking,
    Events,
    Food,
    Navigation,
    Help,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Housing => "housing",
            Intent::Traffic => "traffic",
            Intent::Parking => "parking",
            Intent::Events => "events",
            Intent::Food => "food",
            Intent::Navigation => "navigation",
            Intent::Help => "help",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the router's ordered rule list
pub trait IntentRule: Send + Sync {
    fn intent(&self) -> Intent;

    /// Cheap predicate deciding whether this rule claims the query
    fn matches(&self, query: &NormalizedQuery) -> bool;

    /// Build the response. `None` lets the next rule have a go.
    fn respond(&self, query: &NormalizedQuery, ctx: &RoutingContext) -> Option<RoutingResult>;
}

/// Per-role variants of an intent's response
#[derive(Debug, Clone, PartialEq)]
pub struct RoleVariants<T> {
    pub developer: T,
    pub user: T,
}

impl<T> RoleVariants<T> {
    pub fn for_role(&self, role: Role) -> &T {
        match role {
            Role::Developer => &self.developer,
            Role::User => &self.user,
        }
    }
}

/// How a status intent answers one role
#[derive(Debug, Clone, PartialEq)]
pub enum RoleResponse {
    /// Send the user to a dashboard feature
    Navigate {
        view: String,
        feature: String,
        closing: String,
    },
    /// Answer inline with the status payload attached
    Status { closing: String },
}

impl RoleResponse {
    fn navigate(view: &str, feature: &str, closing: &str) -> Self {
        RoleResponse::Navigate {
            view: view.to_string(),
            feature: feature.to_string(),
            closing: closing.to_string(),
        }
    }

    fn status(closing: &str) -> Self {
        RoleResponse::Status {
            closing: closing.to_string(),
        }
    }
}

/// Area lookup by phrase or slug. First area in table order wins.
#[derive(Debug, Clone)]
struct AreaMatcher(Vec<(KeywordSet, AreaEntry)>);

impl AreaMatcher {
    fn new(areas: &[AreaEntry]) -> Self {
        Self(
            areas
                .iter()
                .map(|area| {
                    (
                        KeywordSet::new([area.phrase.as_str(), area.slug.as_str()]),
                        area.clone(),
                    )
                })
                .collect(),
        )
    }

    fn find(&self, query: &NormalizedQuery) -> Option<&AreaEntry> {
        self.0
            .iter()
            .find(|(matcher, _)| matcher.matches(query))
            .map(|(_, area)| area)
    }
}

/// Housing search: needs both a housing keyword and a known area
pub struct HousingRule {
    housing: KeywordSet,
    areas: AreaMatcher,
    catalog: CityCatalog,
}

impl HousingRule {
    pub fn new(housing_keywords: &[String], areas: &[AreaEntry], catalog: &CityCatalog) -> Self {
        Self {
            housing: KeywordSet::new(housing_keywords),
            areas: AreaMatcher::new(areas),
            catalog: catalog.clone(),
        }
    }

    fn area_in(&self, query: &NormalizedQuery) -> Option<&AreaEntry> {
        self.areas.find(query)
    }

    fn message_for(&self, area: &AreaEntry) -> String {
        let found: Vec<String> = self
            .catalog
            .listings_in(&area.slug)
            .map(|listing| format!("{} ({})", listing.name, listing.price))
            .collect();

        match found.len() {
            0 => format!(
                "I'm searching for apartments near {}. Let me take you to the living page to explore all available options.",
                area.label
            ),
            count => format!(
                "I found {} {} near {}: {}. Let me show you the living page with detailed information.",
                count,
                if count == 1 { "apartment" } else { "apartments" },
                area.label,
                found.join(", ")
            ),
        }
    }
}

impl IntentRule for HousingRule {
    fn intent(&self) -> Intent {
        Intent::Housing
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        self.housing.matches(query) && self.area_in(query).is_some()
    }

    fn respond(&self, query: &NormalizedQuery, ctx: &RoutingContext) -> Option<RoutingResult> {
        let area = self.area_in(query)?;
        Some(
            RoutingResult::navigate(self.message_for(area), ctx.view_path(LIVING_VIEW))
                .with_filter("area", area.slug.as_str()),
        )
    }
}

/// Opening line used instead of the stock summary when the query names an area
struct AreaSummary {
    areas: AreaMatcher,
    render: Box<dyn Fn(&AreaEntry) -> String + Send + Sync>,
}

/// Status report whose answer depends on the caller's role
pub struct StatusRule {
    intent: Intent,
    keywords: KeywordSet,
    summary: String,
    area_summary: Option<AreaSummary>,
    payload: Value,
    responses: RoleVariants<RoleResponse>,
}

impl StatusRule {
    pub fn new(
        intent: Intent,
        keywords: KeywordSet,
        summary: String,
        payload: Value,
        responses: RoleVariants<RoleResponse>,
    ) -> Self {
        Self {
            intent,
            keywords,
            summary,
            area_summary: None,
            payload,
            responses,
        }
    }

    /// Replace the summary with `render(area)` when the query names one of
    /// `areas`
    pub fn with_area_summary<F>(mut self, areas: &[AreaEntry], render: F) -> Self
    where
        F: Fn(&AreaEntry) -> String + Send + Sync + 'static,
    {
        self.area_summary = Some(AreaSummary {
            areas: AreaMatcher::new(areas),
            render: Box::new(render),
        });
        self
    }

    fn summary_for(&self, query: &NormalizedQuery) -> String {
        self.area_summary
            .as_ref()
            .and_then(|local| local.areas.find(query).map(|area| (local.render)(area)))
            .unwrap_or_else(|| self.summary.clone())
    }

    /// Developers are sent to the traffic analysis feature; users get the
    /// report inline.
    pub fn traffic(keywords: &[String], report: &TrafficReport) -> Self {
        Self::new(
            Intent::Traffic,
            KeywordSet::new(keywords),
            report.summary(),
            json!({
                "status": report.status,
                "congestion_level": report.congestion_level,
                "hotspots": report.hotspots,
            }),
            RoleVariants {
                developer: RoleResponse::navigate(
                    DASHBOARD_VIEW,
                    "traffic-analysis",
                    "I can show you the detailed traffic analysis dashboard.",
                ),
                user: RoleResponse::status("Would you like to see the urban view for more details?"),
            },
        )
    }

    /// Unlike traffic, users asking about parking are navigated too, to the
    /// general urban view rather than the analysis feature. Naming an area
    /// changes the opening line only; availability stays city-wide.
    pub fn parking(keywords: &[String], areas: &[AreaEntry], report: &ParkingReport) -> Self {
        let local_report = report.clone();
        Self::new(
            Intent::Parking,
            KeywordSet::new(keywords),
            report.summary(),
            json!({
                "availability": report.availability,
                "zones": report.zones,
            }),
            RoleVariants {
                developer: RoleResponse::navigate(
                    DASHBOARD_VIEW,
                    "parking-analysis",
                    "I can show you the detailed parking analysis dashboard.",
                ),
                user: RoleResponse::navigate(
                    DASHBOARD_VIEW,
                    "urban-view",
                    "Let me show you the urban view for real-time parking information.",
                ),
            },
        )
        .with_area_summary(areas, move |area| local_report.summary_near(&area.label))
    }

    pub fn responses(&self) -> &RoleVariants<RoleResponse> {
        &self.responses
    }
}

impl IntentRule for StatusRule {
    fn intent(&self) -> Intent {
        self.intent
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        self.keywords.matches(query)
    }

    fn respond(&self, query: &NormalizedQuery, ctx: &RoutingContext) -> Option<RoutingResult> {
        let summary = self.summary_for(query);
        let result = match self.responses.for_role(ctx.role) {
            RoleResponse::Navigate {
                view,
                feature,
                closing,
            } => RoutingResult::navigate(format!("{summary}{closing}"), ctx.view_path(view))
                .with_feature(feature.as_str()),
            RoleResponse::Status { closing } => {
                RoutingResult::info_with_data(format!("{summary}{closing}"), self.payload.clone())
            }
        };
        Some(result)
    }
}

/// Role-independent jump to a single view
pub struct ViewRule {
    intent: Intent,
    keywords: KeywordSet,
    message: String,
    view: String,
}

impl ViewRule {
    pub fn new(intent: Intent, keywords: KeywordSet, message: String, view: &str) -> Self {
        Self {
            intent,
            keywords,
            message,
            view: view.to_string(),
        }
    }

    pub fn events(keywords: &[String], events: &[String]) -> Self {
        Self::new(
            Intent::Events,
            KeywordSet::new(keywords),
            format!(
                "Upcoming events in the city: {}. Let me show you the events page for detailed information.",
                events.join(", ")
            ),
            EVENTS_VIEW,
        )
    }
}

impl IntentRule for ViewRule {
    fn intent(&self) -> Intent {
        self.intent
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        self.keywords.matches(query)
    }

    fn respond(&self, _query: &NormalizedQuery, ctx: &RoutingContext) -> Option<RoutingResult> {
        Some(RoutingResult::navigate(
            self.message.clone(),
            ctx.view_path(&self.view),
        ))
    }
}

/// Restaurant search. The word in front of a food keyword ("japanese food")
/// is taken as the cuisine and passed on as a `cuisine` filter.
pub struct FoodRule {
    keywords: KeywordSet,
    restaurants: String,
}

impl FoodRule {
    pub fn new(keywords: &[String], restaurants: &[String]) -> Self {
        Self {
            keywords: KeywordSet::new(keywords),
            restaurants: restaurants.join(", "),
        }
    }

    fn cuisine_in<'q>(&self, query: &'q NormalizedQuery) -> Option<&'q str> {
        self.keywords
            .iter()
            .filter_map(|keyword| query.word_before(keyword))
            .find(|word| !NOT_A_CUISINE.contains(word))
    }
}

impl IntentRule for FoodRule {
    fn intent(&self) -> Intent {
        Intent::Food
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        self.keywords.matches(query)
    }

    fn respond(&self, query: &NormalizedQuery, ctx: &RoutingContext) -> Option<RoutingResult> {
        const CLOSING: &str = "Let me show you the food page for detailed information and locations.";
        let path = ctx.view_path(FOOD_VIEW);

        let result = match self.cuisine_in(query) {
            Some(cuisine) => RoutingResult::navigate(
                format!(
                    "Looking for {cuisine} options. Popular restaurants include: {}. {CLOSING}",
                    self.restaurants
                ),
                path,
            )
            .with_filter("cuisine", cuisine),
            None => RoutingResult::navigate(
                format!("Popular restaurants in the city: {}. {CLOSING}", self.restaurants),
                path,
            ),
        };
        Some(result)
    }
}

/// Explicit "go to X" requests.
///
/// The navigation phrase that starts earliest in the query is the one
/// honoured. Its destination is searched for between that phrase and the
/// next navigation phrase, if any. So "dashboard, go to health" lands on
/// health, and "navigate to networks, or go to dashboard" lands on networks.
/// Declines when nothing in the table matches.
pub struct NavigationRule {
    phrases: KeywordSet,
    destinations: DestinationTable,
}

impl NavigationRule {
    pub fn new(phrases: &[String], destinations: DestinationTable) -> Self {
        Self {
            phrases: KeywordSet::new(phrases),
            destinations,
        }
    }
}

impl IntentRule for NavigationRule {
    fn intent(&self) -> Intent {
        Intent::Navigation
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        self.phrases.matches(query)
    }

    fn respond(&self, query: &NormalizedQuery, ctx: &RoutingContext) -> Option<RoutingResult> {
        let phrase = self.phrases.earliest_in(query)?;
        let remaining = query.after(phrase)?;
        let end = self
            .phrases
            .iter()
            .filter_map(|next| remaining.find(next))
            .min()
            .unwrap_or(remaining.len());
        let destination = self.destinations.lookup(&remaining[..end])?;

        Some(RoutingResult::navigate(
            format!("Taking you to the {} page.", destination.keyword),
            destination.path.resolve(ctx),
        ))
    }
}

/// The fixed help response returned when no rule claims a query
pub fn help_result() -> RoutingResult {
    RoutingResult::info(HELP_MESSAGE)
}

/// The stock rule list in priority order: housing, traffic, parking,
/// events, food, navigation.
pub fn standard_rules(
    intents: &IntentSection,
    destinations: &[DestinationEntry],
    catalog: &CityCatalog,
) -> Vec<Box<dyn IntentRule>> {
    vec![
        Box::new(HousingRule::new(
            &intents.housing_keywords,
            &intents.areas,
            catalog,
        )),
        Box::new(StatusRule::traffic(&intents.traffic_keywords, &catalog.traffic)),
        Box::new(StatusRule::parking(
            &intents.parking_keywords,
            &intents.areas,
            &catalog.parking,
        )),
        Box::new(ViewRule::events(&intents.events_keywords, &catalog.events)),
        Box::new(FoodRule::new(&intents.food_keywords, &catalog.restaurants)),
        Box::new(NavigationRule::new(
            &intents.navigation_phrases,
            DestinationTable::from_entries(destinations),
        )),
    ]
}
