#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and aggregate result types for collision reports.
//!
//! Everything a presentation layer receives back from the report engine
//! lives here: the per-request [`FilterCriteria`], the per-chart count
//! types, and [`AggregateResult`], the explicit degraded-result type that
//! distinguishes "insufficient data for this view" from both success and
//! failure.

use collision_insights_collision_models::{Borough, InjuryType, VehicleCategory};
use collision_insights_query::InterpretedQuery;
use serde::{Deserialize, Serialize};

/// One report request's filter constraints.
///
/// Ephemeral: constructed from a user submission, consumed once by the
/// filter composer, then discarded. Every facet is multi-valued; an empty
/// facet applies no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Boroughs to keep (empty = all).
    pub boroughs: Vec<Borough>,
    /// Crash years to keep (empty = all).
    pub years: Vec<i32>,
    /// Vehicle categories to keep (empty = all).
    pub vehicle_categories: Vec<VehicleCategory>,
    /// Contributing factor strings to keep, compared case-insensitively
    /// (empty = all).
    pub contributing_factors: Vec<String>,
    /// Injury participant types to keep (empty = all).
    pub injury_types: Vec<InjuryType>,
}

impl FilterCriteria {
    /// Returns `true` when no facet constrains anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boroughs.is_empty()
            && self.years.is_empty()
            && self.vehicle_categories.is_empty()
            && self.contributing_factors.is_empty()
            && self.injury_types.is_empty()
    }

    /// Folds an interpreted free-text query into the explicit facets.
    ///
    /// Each extracted value is appended to the corresponding facet unless
    /// already selected, so the interpreter composes with dropdown
    /// selections instead of replacing them. This is the system's single
    /// text-query strategy.
    pub fn merge_query(&mut self, query: &InterpretedQuery) {
        if let Some(borough) = query.borough
            && !self.boroughs.contains(&borough)
        {
            self.boroughs.push(borough);
        }
        if let Some(year) = query.year
            && !self.years.contains(&year)
        {
            self.years.push(year);
        }
        if let Some(injury) = query.injury_type
            && !self.injury_types.contains(&injury)
        {
            self.injury_types.push(injury);
        }
    }
}

/// An aggregate view that either carries data or an explicit
/// "insufficient data" marker.
///
/// Missing source columns and empty filter results degrade to
/// [`AggregateResult::Insufficient`] scoped to the one affected view,
/// never an error for the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AggregateResult<T> {
    /// The aggregate was computed.
    #[serde(rename_all = "camelCase")]
    Data {
        /// The computed view.
        data: T,
    },
    /// Not enough source data to compute this view.
    #[serde(rename_all = "camelCase")]
    Insufficient {
        /// Why the view could not be computed.
        reason: String,
    },
}

impl<T> AggregateResult<T> {
    /// The computed data, if present.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Data { data } => Some(data),
            Self::Insufficient { .. } => None,
        }
    }

    /// Returns `true` when this view degraded.
    #[must_use]
    pub const fn is_insufficient(&self) -> bool {
        matches!(self, Self::Insufficient { .. })
    }
}

/// Collision count for a single borough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoroughCount {
    /// The borough.
    pub borough: Borough,
    /// Number of collisions.
    pub count: u64,
}

/// A time-series bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
    /// Bucket label ("2021" for yearly, "2021-07" for monthly).
    pub period: String,
    /// Number of collisions in the bucket.
    pub count: u64,
}

/// Collision count for one (day-of-week, hour-of-day) cell of the
/// heatmap. Days are indexed 0 = Monday through 6 = Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHourCount {
    /// Day name ("Monday" .. "Sunday").
    pub day: String,
    /// Day index, 0 = Monday .. 6 = Sunday.
    pub day_index: u8,
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Number of collisions in this cell.
    pub count: u64,
}

/// Collision count for a single vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// The vehicle category.
    pub category: VehicleCategory,
    /// Number of collisions.
    pub count: u64,
}

/// A sampled record location for map rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Persons injured in this collision (drives marker size).
    pub persons_injured: u32,
}

/// Headline totals for the filtered subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Total collisions matching the filters.
    pub total_crashes: u64,
    /// Sum of persons injured.
    pub persons_injured: u64,
    /// Sum of pedestrians injured.
    pub pedestrians_injured: u64,
    /// Sum of cyclists injured.
    pub cyclists_injured: u64,
}

/// Bucket size for the collisions-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGranularity {
    /// One bucket per calendar year.
    Yearly,
    /// One bucket per calendar month.
    Monthly,
}

/// A complete computed report for one filter request.
///
/// An empty filter result is a first-class outcome: `no_matches` is set,
/// the summary is all zeros, and every aggregate is
/// [`AggregateResult::Insufficient`] — the presentation layer must render
/// this distinctly, not as an empty chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Whether the filters matched zero records.
    pub no_matches: bool,
    /// Headline totals.
    pub summary: SummaryStats,
    /// Collisions per borough, descending by count.
    pub by_borough: AggregateResult<Vec<BoroughCount>>,
    /// Granularity the time series was bucketed at.
    pub time_granularity: TimeGranularity,
    /// Collisions over time, ascending by period.
    pub over_time: AggregateResult<Vec<PeriodCount>>,
    /// Day-of-week × hour-of-day heatmap cells.
    pub by_day_hour: AggregateResult<Vec<DayHourCount>>,
    /// Top vehicle categories by count.
    pub top_vehicle_categories: AggregateResult<Vec<CategoryCount>>,
    /// Deterministic sample of plottable record locations.
    pub location_sample: AggregateResult<Vec<MapPoint>>,
}
