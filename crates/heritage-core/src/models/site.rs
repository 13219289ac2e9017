use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::geometry::GeoPoint;
use crate::error::HeritageError;

/// Unique site identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Historical period a site belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    EasterRising,
    WarIndependence,
    Treaty,
    #[default]
    CivilWar,
    Aftermath,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::EasterRising,
        Category::WarIndependence,
        Category::Treaty,
        Category::CivilWar,
        Category::Aftermath,
    ];

    /// Stored code, e.g. `CIVIL_WAR`
    pub fn code(&self) -> &'static str {
        match self {
            Category::EasterRising => "EASTER_RISING",
            Category::WarIndependence => "WAR_INDEPENDENCE",
            Category::Treaty => "TREATY",
            Category::CivilWar => "CIVIL_WAR",
            Category::Aftermath => "AFTERMATH",
        }
    }

    /// Human-readable label including the period
    pub fn label(&self) -> &'static str {
        match self {
            Category::EasterRising => "Easter Rising (1916)",
            Category::WarIndependence => "War of Independence (1919-1921)",
            Category::Treaty => "Treaty Period (1921-1922)",
            Category::CivilWar => "Civil War (1922-1923)",
            Category::Aftermath => "Aftermath & Establishment (1923+)",
        }
    }

    /// Map a source-data period name to a category
    pub fn from_source_label(label: &str) -> Option<Category> {
        match label.trim() {
            "Easter Rising" => Some(Category::EasterRising),
            "War of Independence" => Some(Category::WarIndependence),
            "Treaty Period" => Some(Category::Treaty),
            "Civil War" => Some(Category::CivilWar),
            "Civil War End" | "Aftermath" => Some(Category::Aftermath),
            _ => None,
        }
    }
}

impl FromStr for Category {
    type Err = HeritageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.code() == normalized)
            .ok_or_else(|| {
                HeritageError::invalid_parameter(
                    "category",
                    format!(
                        "unknown category '{}'. Use one of: {}",
                        s,
                        Category::ALL.map(|c| c.code()).join(", ")
                    ),
                )
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A historical event anchored at a single WGS84 point.
///
/// Immutable once admitted to the catalog; re-ingesting under the same id
/// replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSite {
    pub id: SiteId,
    pub name: String,
    pub event_date: NaiveDate,
    pub location_name: String,
    pub location: GeoPoint,
    pub significance: String,
    pub category: Category,
    pub event_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub casualties: Option<u32>,
    #[serde(default)]
    pub commanders: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl HistoricalSite {
    /// Create a site with the required fields; payload fields start empty
    pub fn new(
        id: SiteId,
        name: impl Into<String>,
        event_date: NaiveDate,
        location: GeoPoint,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            event_date,
            location_name: String::new(),
            location,
            significance: String::new(),
            category: Category::default(),
            event_type: String::new(),
            description: None,
            casualties: None,
            commanders: Vec::new(),
            images: Vec::new(),
            audio_url: None,
            sources: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn with_location_name(mut self, location_name: impl Into<String>) -> Self {
        self.location_name = location_name.into();
        self
    }

    pub fn latitude(&self) -> f64 {
        self.location.lat
    }

    pub fn longitude(&self) -> f64 {
        self.location.lon
    }

    /// Natural ordering: event date, then name
    pub fn natural_cmp(&self, other: &HistoricalSite) -> Ordering {
        self.event_date.cmp(&other.event_date).then_with(|| self.name.cmp(&other.name))
    }

    /// Chronological ordering with the identifier as tie-break
    pub fn chronological_cmp(&self, other: &HistoricalSite) -> Ordering {
        self.event_date.cmp(&other.event_date).then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for HistoricalSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.event_date.year())
    }
}
