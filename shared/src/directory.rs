//! Static city directory
//!
//! The read-only catalog the zone editor searches and adds from. Several
//! cities share a zone identifier; identity is the city `id`.

use crate::zone_list::ZoneEntry;

/// A known city in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    pub id: &'static str,
    pub name: &'static str,
    pub zone: &'static str,
    pub glyph: &'static str,
}

impl City {
    const fn new(
        id: &'static str,
        name: &'static str,
        zone: &'static str,
        glyph: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            zone,
            glyph,
        }
    }

    /// Clone this city into a user list entry with a blank label
    pub fn to_entry(&self) -> ZoneEntry {
        ZoneEntry::new(self.id, self.name, self.zone, self.glyph)
    }

    /// Case-insensitive substring match on name and zone identifier
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.zone.to_lowercase().contains(needle)
    }
}

const CITIES: &[City] = &[
    // North America
    City::new("ny", "New York", "America/New_York", "🗽"),
    City::new("la", "Los Angeles", "America/Los_Angeles", "🌴"),
    City::new("sf", "San Francisco", "America/Los_Angeles", "🌉"),
    City::new("chicago", "Chicago", "America/Chicago", "🌆"),
    City::new("denver", "Denver", "America/Denver", "⛰️"),
    City::new("phoenix", "Phoenix", "America/Phoenix", "🌵"),
    City::new("seattle", "Seattle", "America/Los_Angeles", "🌲"),
    City::new("miami", "Miami", "America/New_York", "🏖️"),
    City::new("boston", "Boston", "America/New_York", "🦞"),
    City::new("atlanta", "Atlanta", "America/New_York", "🍑"),
    City::new("toronto", "Toronto", "America/Toronto", "🍁"),
    City::new("vancouver", "Vancouver", "America/Vancouver", "🏔️"),
    City::new("mexico-city", "Mexico City", "America/Mexico_City", "🌮"),
    // South America
    City::new("sao-paulo", "São Paulo", "America/Sao_Paulo", "🇧🇷"),
    City::new(
        "buenos-aires",
        "Buenos Aires",
        "America/Argentina/Buenos_Aires",
        "⚽",
    ),
    City::new("rio", "Rio de Janeiro", "America/Sao_Paulo", "🏖️"),
    // Europe
    City::new("london", "London", "Europe/London", "🏰"),
    City::new("paris", "Paris", "Europe/Paris", "🗼"),
    City::new("berlin", "Berlin", "Europe/Berlin", "🏛️"),
    City::new("madrid", "Madrid", "Europe/Madrid", "🇪🇸"),
    City::new("rome", "Rome", "Europe/Rome", "🏛️"),
    City::new("amsterdam", "Amsterdam", "Europe/Amsterdam", "🇳🇱"),
    City::new("moscow", "Moscow", "Europe/Moscow", "🏛️"),
    City::new("istanbul", "Istanbul", "Europe/Istanbul", "🕌"),
    City::new("dublin", "Dublin", "Europe/Dublin", "🍀"),
    // Asia
    City::new("tokyo", "Tokyo", "Asia/Tokyo", "🗼"),
    City::new("seoul", "Seoul", "Asia/Seoul", "🇰🇷"),
    City::new("beijing", "Beijing", "Asia/Shanghai", "🇨🇳"),
    City::new("shanghai", "Shanghai", "Asia/Shanghai", "🏙️"),
    City::new("hong-kong", "Hong Kong", "Asia/Hong_Kong", "🏙️"),
    City::new("singapore", "Singapore", "Asia/Singapore", "🦁"),
    City::new("bangkok", "Bangkok", "Asia/Bangkok", "🛕"),
    City::new("dubai", "Dubai", "Asia/Dubai", "🏜️"),
    City::new("mumbai", "Mumbai", "Asia/Kolkata", "🕌"),
    City::new("delhi", "Delhi", "Asia/Kolkata", "🇮🇳"),
    // Oceania
    City::new("sydney", "Sydney", "Australia/Sydney", "🦘"),
    City::new("melbourne", "Melbourne", "Australia/Melbourne", "🏙️"),
    City::new("auckland", "Auckland", "Pacific/Auckland", "🥝"),
];

/// All cities, in catalog order
pub fn all_cities() -> &'static [City] {
    CITIES
}

/// Look up a city by its id
pub fn find_city(id: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.id == id)
}

/// Lazily filter the catalog by name or zone identifier
///
/// Matching is a case-insensitive substring test; an empty query yields the
/// whole catalog. The iterator owns its lowercase copy of `query`.
pub fn search_cities(query: &str) -> impl Iterator<Item = &'static City> {
    let needle = query.to_lowercase();
    CITIES.iter().filter(move |city| city.matches(&needle))
}
