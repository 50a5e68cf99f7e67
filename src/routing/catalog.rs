//! Static city data the response templates draw from
//!
//! The dashboard runs on mock data, so this is a fixed snapshot rather than
//! a live feed.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReport {
    pub status: String,
    pub congestion_level: u8,
    pub hotspots: Vec<String>,
}

impl TrafficReport {
    pub fn summary(&self) -> String {
        let mut message = format!(
            "Current traffic status is {} with {}% congestion level. ",
            self.status, self.congestion_level
        );
        if !self.hotspots.is_empty() {
            message.push_str(&format!(
                "Main congestion areas: {}. ",
                self.hotspots.join(", ")
            ));
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingReport {
    pub availability: String,
    pub zones: Vec<String>,
}

impl ParkingReport {
    pub fn summary(&self) -> String {
        let message = format!("Current parking availability: {}. ", self.availability);
        self.with_zones(message)
    }

    /// Summary for a query naming an area. Availability is city-wide.
    pub fn summary_near(&self, area_label: &str) -> String {
        let message = format!(
            "Checking parking availability near {}. Current city-wide availability: {}. ",
            area_label, self.availability
        );
        self.with_zones(message)
    }

    fn with_zones(&self, mut message: String) -> String {
        if !self.zones.is_empty() {
            message.push_str(&format!("Available zones: {}. ", self.zones.join(", ")));
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HousingListing {
    pub name: String,
    /// Area slug, matches `AreaEntry::slug`
    pub area: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCatalog {
    pub traffic: TrafficReport,
    pub parking: ParkingReport,
    pub events: Vec<String>,
    pub restaurants: Vec<String>,
    pub housing: Vec<HousingListing>,
}

impl CityCatalog {
    pub fn listings_in<'a>(&'a self, area_slug: &'a str) -> impl Iterator<Item = &'a HousingListing> {
        self.housing.iter().filter(move |listing| listing.area == area_slug)
    }
}

fn listing(name: &str, area: &str, price: &str) -> HousingListing {
    HousingListing {
        name: name.to_string(),
        area: area.to_string(),
        price: price.to_string(),
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self {
            traffic: TrafficReport {
                status: "moderate".to_string(),
                congestion_level: 68,
                hotspots: names(&["Highway 101", "Downtown Core", "Tech Quarter Bridge"]),
            },
            parking: ParkingReport {
                availability: "34% occupied".to_string(),
                zones: names(&["Downtown Core", "Shopping District", "Business Quarter"]),
            },
            events: names(&[
                "Tech Innovation Summit",
                "Urban Green Festival",
                "Cultural Heritage Night",
            ]),
            restaurants: names(&["Quantum Bistro", "Neon Noodle House", "Vertical Farm Cafe"]),
            housing: vec![
                listing("Skyline Apartments", "area-y", "$2,800/month"),
                listing("Green Valley Condos", "area-y", "$2,200/month"),
                listing("Tech Quarter Lofts", "tech-quarter", "$3,200/month"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_summary() {
        let catalog = CityCatalog::default();
        assert_eq!(
            catalog.traffic.summary(),
            "Current traffic status is moderate with 68% congestion level. \
             Main congestion areas: Highway 101, Downtown Core, Tech Quarter Bridge. "
        );
    }

    #[test]
    fn test_parking_summary_without_zones() {
        let report = ParkingReport {
            availability: "90% occupied".to_string(),
            zones: Vec::new(),
        };
        assert_eq!(report.summary(), "Current parking availability: 90% occupied. ");
    }

    #[test]
    fn test_parking_summary_near_area() {
        let catalog = CityCatalog::default();
        assert_eq!(
            catalog.parking.summary_near("Downtown"),
            "Checking parking availability near Downtown. Current city-wide availability: 34% occupied. \
             Available zones: Downtown Core, Shopping District, Business Quarter. "
        );
    }

    #[test]
    fn test_listings_in_area() {
        let catalog = CityCatalog::default();
        let names: Vec<_> = catalog.listings_in("area-y").map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Skyline Apartments", "Green Valley Condos"]);
        assert_eq!(catalog.listings_in("area-z").count(), 0);
    }
}
