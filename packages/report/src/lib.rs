#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter composition and aggregation engine for collision reports.
//!
//! One report request flows through [`filter::apply`] to narrow the
//! shared dataset, then through the [`aggregate`] and [`sample`] builders
//! to produce the chart-data views. [`build_report`] orchestrates the
//! whole cycle. Every step is a synchronous pure computation over the
//! in-memory dataset; nothing here mutates shared state or aborts the
//! request on missing data.

pub mod aggregate;
pub mod filter;
pub mod sample;

use collision_insights_dataset::Dataset;
use collision_insights_report_models::{FilterCriteria, Report, TimeGranularity};

/// How many vehicle categories the report's ranking keeps.
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

/// Applies the criteria and computes every aggregate view in one pass.
///
/// The time series is bucketed monthly when the criteria pin down exactly
/// one year (the per-month breakdown the original dashboard shows for a
/// single-year report) and yearly otherwise. The location sample uses the
/// default cap and seed; call the [`sample`] builder directly to override
/// them.
#[must_use]
pub fn build_report(dataset: &Dataset, criteria: &FilterCriteria) -> Report {
    build_report_with(
        dataset,
        criteria,
        sample::DEFAULT_SAMPLE_CAP,
        sample::DEFAULT_SAMPLE_SEED,
    )
}

/// [`build_report`] with an explicit sample cap and seed.
#[must_use]
pub fn build_report_with(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    sample_cap: usize,
    sample_seed: u64,
) -> Report {
    let view = filter::apply(dataset, criteria);

    let time_granularity = if criteria.years.len() == 1 {
        TimeGranularity::Monthly
    } else {
        TimeGranularity::Yearly
    };

    let no_matches = view.is_empty();
    if no_matches {
        log::debug!("Report request matched zero of {} records", dataset.len());
    }

    Report {
        no_matches,
        summary: view.summary(),
        by_borough: aggregate::by_borough(&view),
        time_granularity,
        over_time: aggregate::by_period(&view, time_granularity),
        by_day_hour: aggregate::by_day_hour(&view),
        top_vehicle_categories: aggregate::top_vehicle_categories(
            &view,
            DEFAULT_TOP_CATEGORIES,
        ),
        location_sample: sample::location_sample(&view, sample_cap, sample_seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike as _, NaiveDate, NaiveTime};
    use collision_insights_collision_models::{
        Borough, CollisionRecord, InjuryType, VehicleCategory,
    };

    fn record(borough: Borough, date: &str, time: &str, category: VehicleCategory) -> CollisionRecord {
        let crash_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        CollisionRecord {
            borough: Some(borough),
            crash_date,
            crash_time: NaiveTime::parse_from_str(time, "%H:%M").ok(),
            year: crash_date.map(|d| d.year()),
            raw_vehicle_type: None,
            vehicle_category: category,
            contributing_factor: Some("Unspecified".to_string()),
            injury_type: Some(InjuryType::Motorist),
            latitude: Some(40.7),
            longitude: Some(-73.9),
            persons_injured: 1,
            pedestrians_injured: 0,
            cyclists_injured: 0,
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record(Borough::Brooklyn, "2021-07-04", "09:00", VehicleCategory::Taxi),
            record(Borough::Brooklyn, "2021-08-10", "17:30", VehicleCategory::Suv),
            record(Borough::Queens, "2022-01-15", "08:05", VehicleCategory::Bus),
        ])
    }

    #[test]
    fn full_report_over_unfiltered_data() {
        let dataset = sample_dataset();
        let report = build_report(&dataset, &FilterCriteria::default());

        assert!(!report.no_matches);
        assert_eq!(report.summary.total_crashes, 3);
        assert_eq!(report.time_granularity, TimeGranularity::Yearly);
        assert!(report.by_borough.data().is_some());
        assert!(report.over_time.data().is_some());
        assert!(report.by_day_hour.data().is_some());
        assert!(report.location_sample.data().is_some());
    }

    #[test]
    fn single_year_criteria_switches_to_monthly() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            years: vec![2021],
            ..FilterCriteria::default()
        };
        let report = build_report(&dataset, &criteria);

        assert_eq!(report.time_granularity, TimeGranularity::Monthly);
        let periods = report.over_time.data().expect("monthly series");
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].period, "2021-07");
    }

    #[test]
    fn zero_matches_sets_the_flag_and_degrades_aggregates() {
        let dataset = sample_dataset();
        let criteria = FilterCriteria {
            boroughs: vec![Borough::StatenIsland],
            ..FilterCriteria::default()
        };
        let report = build_report(&dataset, &criteria);

        assert!(report.no_matches);
        assert_eq!(report.summary.total_crashes, 0);
        assert!(report.by_borough.is_insufficient());
        assert!(report.over_time.is_insufficient());
        assert!(report.by_day_hour.is_insufficient());
        assert!(report.top_vehicle_categories.is_insufficient());
        assert!(report.location_sample.is_insufficient());
    }

    #[test]
    fn empty_dataset_produces_a_degraded_report_not_an_error() {
        let report = build_report(&Dataset::empty(), &FilterCriteria::default());
        assert!(report.no_matches);
        assert_eq!(report.summary.total_crashes, 0);
        assert!(report.location_sample.is_insufficient());
    }

    #[test]
    fn interpreted_query_drives_the_report() {
        let dataset = sample_dataset();
        let mut criteria = FilterCriteria::default();
        criteria.merge_query(&collision_insights_query::interpret(
            "brooklyn 2021 motorist",
        ));
        let report = build_report(&dataset, &criteria);

        assert!(!report.no_matches);
        assert_eq!(report.summary.total_crashes, 2);
        assert_eq!(report.time_granularity, TimeGranularity::Monthly);
    }
}
