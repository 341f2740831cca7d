#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Free-text search query interpreter.
//!
//! Maps a short natural-language search string ("Queens 2022 pedestrian
//! crashes") onto structured filter values: at most one borough, one
//! four-digit year, and one injury participant type, each independently
//! optional. Keyword detection uses ordered first-match-wins rules, so a
//! query naming several boroughs or injury types yields only the first
//! per the canonical ordering.

use collision_insights_collision_models::{Borough, InjuryType};
use serde::{Deserialize, Serialize};

/// Earliest year the interpreter accepts (the collision dataset starts
/// in 2012).
pub const MIN_QUERY_YEAR: i32 = 2012;
/// Latest year the interpreter accepts.
pub const MAX_QUERY_YEAR: i32 = 2030;

/// The structured values extracted from a free-text search string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedQuery {
    /// First borough named in the query, if any.
    pub borough: Option<Borough>,
    /// First plausible four-digit year in the query, if any.
    pub year: Option<i32>,
    /// First injury participant keyword in the query, if any.
    pub injury_type: Option<InjuryType>,
}

impl InterpretedQuery {
    /// Returns `true` when no field was extracted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.borough.is_none() && self.year.is_none() && self.injury_type.is_none()
    }
}

/// Interprets a free-text search string into structured filter values.
///
/// Total over its input domain: empty or whitespace-only text yields an
/// empty [`InterpretedQuery`]. Matching is case-insensitive substring
/// containment (not whole-word), so "BROOKLYNITE" still detects Brooklyn.
#[must_use]
pub fn interpret(text: &str) -> InterpretedQuery {
    let upper = text.to_uppercase();
    if upper.trim().is_empty() {
        return InterpretedQuery::default();
    }

    InterpretedQuery {
        borough: detect_borough(&upper),
        year: detect_year(&upper),
        injury_type: detect_injury_type(&upper),
    }
}

/// Returns the first borough whose canonical name appears in the
/// uppercased text, scanning boroughs in canonical order.
fn detect_borough(upper: &str) -> Option<Borough> {
    Borough::all()
        .iter()
        .copied()
        .find(|b| upper.contains(b.as_ref()))
}

/// Returns the first whitespace-delimited token that is exactly four
/// digits and parses into the plausible year range.
fn detect_year(upper: &str) -> Option<i32> {
    upper
        .split_whitespace()
        .filter(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<i32>().ok())
        .find(|year| (MIN_QUERY_YEAR..=MAX_QUERY_YEAR).contains(year))
}

/// Ordered keyword rules for injury participant detection. "PEDESTRIAN"
/// outranks the cyclist keywords, which outrank the motorist ones.
fn detect_injury_type(upper: &str) -> Option<InjuryType> {
    if upper.contains("PEDESTRIAN") {
        return Some(InjuryType::Pedestrian);
    }
    if upper.contains("CYCLIST") || upper.contains("BICYCLE") {
        return Some(InjuryType::Cyclist);
    }
    if upper.contains("MOTORIST") || upper.contains("DRIVER") {
        return Some(InjuryType::Motorist);
    }
    None
}
