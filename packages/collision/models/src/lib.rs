#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical collision record types and the vehicle category taxonomy.
//!
//! This crate defines the closed-set enumerations (borough, vehicle
//! category, injury participant type) shared across the whole
//! collision-insights system, plus [`CollisionRecord`], the normalized
//! per-row format every loader produces.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The five NYC boroughs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Borough {
    /// The Bronx
    Bronx,
    /// Brooklyn (Kings County)
    Brooklyn,
    /// Manhattan (New York County)
    Manhattan,
    /// Queens
    Queens,
    /// Staten Island (Richmond County)
    #[serde(rename = "STATEN ISLAND")]
    #[strum(serialize = "STATEN ISLAND")]
    StatenIsland,
}

impl Borough {
    /// Returns all boroughs in the canonical order used for keyword
    /// detection and stable display.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bronx,
            Self::Brooklyn,
            Self::Manhattan,
            Self::Queens,
            Self::StatenIsland,
        ]
    }
}

/// Normalized vehicle type classification.
///
/// Raw vehicle type strings in the source data are free text ("Station
/// Wagon/Sport Utility Vehicle", "4 dr sedan", "PK", ...). Every record
/// is mapped onto this closed set exactly once at load time via
/// [`VehicleCategory::from_raw`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VehicleCategory {
    /// Ambulances and other EMS vehicles
    Ambulance,
    /// Taxis and livery cabs
    Taxi,
    /// City and charter buses
    Bus,
    /// Motorcycles, scooters, motorbikes
    Motorcycle,
    /// Bicycles and e-bikes
    Bicycle,
    /// SUVs and station wagons
    Suv,
    /// Trucks, vans, and pickups
    #[serde(rename = "TRUCK/VAN")]
    #[strum(serialize = "TRUCK/VAN")]
    TruckVan,
    /// Sedans and other passenger cars
    Car,
    /// Recognizable text that matches no keyword rule
    Other,
    /// Missing or empty vehicle type field
    Unknown,
}

impl VehicleCategory {
    /// Returns all categories in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Ambulance,
            Self::Taxi,
            Self::Bus,
            Self::Motorcycle,
            Self::Bicycle,
            Self::Suv,
            Self::TruckVan,
            Self::Car,
            Self::Other,
            Self::Unknown,
        ]
    }

    /// Maps a raw free-text vehicle type onto the canonical category.
    ///
    /// Matching is case-insensitive substring detection against an ordered
    /// rule list; the first rule that matches wins. Rule order is part of
    /// the contract — "BUS STATION" classifies as [`Self::Bus`] because the
    /// bus rule precedes the station-wagon rule, and "AMBULANCE VAN" is an
    /// [`Self::Ambulance`] because the ambulance rule comes first.
    ///
    /// Absent or empty input returns [`Self::Unknown`]; text matching no
    /// rule returns [`Self::Other`]. Total over its input domain.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        if raw.trim().is_empty() {
            return Self::Unknown;
        }

        let upper = raw.to_uppercase();

        if upper.contains("AMB") {
            return Self::Ambulance;
        }
        if upper.contains("TAXI") {
            return Self::Taxi;
        }
        if upper.contains("BUS") {
            return Self::Bus;
        }
        if contains_any(&upper, &["MOTORCYCLE", "SCOOTER", "MOTORBIKE"]) {
            return Self::Motorcycle;
        }
        if contains_any(&upper, &["BICYCLE", "BIKE"]) {
            return Self::Bicycle;
        }
        if contains_any(&upper, &["SUV", "STATION WAGON"]) {
            return Self::Suv;
        }
        // "PICK" covers "PICKUP" and "PICK-UP", and must precede the
        // generic truck/van rule so that classification stays stable if
        // the two rules ever diverge.
        if upper.contains("PICK") {
            return Self::TruckVan;
        }
        if contains_any(&upper, &["TRUCK", "VAN"]) {
            return Self::TruckVan;
        }
        if contains_any(
            &upper,
            &["SEDAN", "4 DOOR", "4-DOOR", "2 DOOR", "2-DOOR"],
        ) {
            return Self::Car;
        }

        Self::Other
    }
}

/// Injury participant classification for a collision record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum InjuryType {
    /// A pedestrian was injured or killed
    Pedestrian,
    /// A cyclist was injured or killed
    Cyclist,
    /// A motorist (driver or passenger) was injured or killed
    Motorist,
}

impl InjuryType {
    /// Returns all injury types in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pedestrian, Self::Cyclist, Self::Motorist]
    }
}

/// Southern latitude bound for a plausible NYC coordinate.
pub const MIN_PLAUSIBLE_LAT: f64 = 40.0;
/// Northern latitude bound for a plausible NYC coordinate.
pub const MAX_PLAUSIBLE_LAT: f64 = 41.2;
/// Western longitude bound for a plausible NYC coordinate.
pub const MIN_PLAUSIBLE_LNG: f64 = -74.5;
/// Eastern longitude bound for a plausible NYC coordinate.
pub const MAX_PLAUSIBLE_LNG: f64 = -73.2;

/// A collision normalized to the canonical schema.
///
/// Immutable once loaded. Any field the source row lacks is `None`
/// (or zero for the injury counts); [`CollisionRecord::vehicle_category`]
/// is always present, defaulting to [`VehicleCategory::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionRecord {
    /// Borough where the collision occurred.
    pub borough: Option<Borough>,
    /// Calendar date of the crash.
    pub crash_date: Option<NaiveDate>,
    /// Time of day of the crash.
    pub crash_time: Option<NaiveTime>,
    /// Crash year, derived from `crash_date` (or the source's own year
    /// column when the date is unparseable).
    pub year: Option<i32>,
    /// Original free-text vehicle type, kept for display.
    pub raw_vehicle_type: Option<String>,
    /// Normalized vehicle category, computed once at load.
    pub vehicle_category: VehicleCategory,
    /// Free-text contributing factor (e.g. "Driver Inattention/Distraction").
    pub contributing_factor: Option<String>,
    /// Injured participant classification.
    pub injury_type: Option<InjuryType>,
    /// Latitude (WGS84). `None` if the source lacks coordinates.
    pub latitude: Option<f64>,
    /// Longitude (WGS84). `None` if the source lacks coordinates.
    pub longitude: Option<f64>,
    /// Number of persons injured.
    pub persons_injured: u32,
    /// Number of pedestrians injured.
    pub pedestrians_injured: u32,
    /// Number of cyclists injured.
    pub cyclists_injured: u32,
}

impl CollisionRecord {
    /// Returns the record's coordinates when both are present and fall
    /// within plausible NYC bounds. Out-of-range values (null-island
    /// zeros, swapped axes, bad geocodes) are treated as absent.
    #[must_use]
    pub fn plausible_location(&self) -> Option<(f64, f64)> {
        let lat = self.latitude?;
        let lng = self.longitude?;
        if (MIN_PLAUSIBLE_LAT..=MAX_PLAUSIBLE_LAT).contains(&lat)
            && (MIN_PLAUSIBLE_LNG..=MAX_PLAUSIBLE_LNG).contains(&lng)
        {
            Some((lat, lng))
        } else {
            None
        }
    }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
