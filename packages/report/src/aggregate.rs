//! Chart-data aggregations over a filtered view.
//!
//! Each builder is a pure read-only pass over the view's records and
//! returns an [`AggregateResult`]: either the computed series or an
//! explicit `Insufficient` marker when the source column is missing or
//! no record carries a usable value. A degraded aggregate never takes
//! down the rest of the report.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Timelike as _};
use collision_insights_collision_models::VehicleCategory;
use collision_insights_report_models::{
    AggregateResult, BoroughCount, CategoryCount, DayHourCount, PeriodCount, TimeGranularity,
};

use crate::filter::FilteredView;

/// Day names indexed by `Weekday::num_days_from_monday()`.
const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn insufficient<T>(reason: &str) -> AggregateResult<T> {
    AggregateResult::Insufficient {
        reason: reason.to_string(),
    }
}

/// Counts collisions per borough, sorted descending by count (ties in
/// canonical borough order).
#[must_use]
pub fn by_borough(view: &FilteredView<'_>) -> AggregateResult<Vec<BoroughCount>> {
    if !view.columns().borough {
        return insufficient("borough column not loaded");
    }

    let mut counts = BTreeMap::new();
    for record in view.records() {
        if let Some(borough) = record.borough {
            *counts.entry(borough).or_insert(0u64) += 1;
        }
    }

    if counts.is_empty() {
        return insufficient("no borough values in the filtered records");
    }

    let mut rows: Vec<BoroughCount> = counts
        .into_iter()
        .map(|(borough, count)| BoroughCount { borough, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.borough.cmp(&b.borough)));
    AggregateResult::Data { data: rows }
}

/// Buckets collisions over time, sorted ascending by period.
///
/// Yearly buckets are labeled `"2021"`; monthly buckets `"2021-07"`.
/// Monthly bucketing needs the full crash date, so records without one
/// are excluded; yearly bucketing uses the derived year column.
#[must_use]
pub fn by_period(
    view: &FilteredView<'_>,
    granularity: TimeGranularity,
) -> AggregateResult<Vec<PeriodCount>> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    match granularity {
        TimeGranularity::Yearly => {
            if !view.columns().year {
                return insufficient("no date or year column loaded");
            }
            for record in view.records() {
                if let Some(year) = record.year {
                    *counts.entry(year.to_string()).or_insert(0) += 1;
                }
            }
        }
        TimeGranularity::Monthly => {
            if !view.columns().crash_date {
                return insufficient("crash date column not loaded");
            }
            for record in view.records() {
                if let Some(date) = record.crash_date {
                    let label = format!("{:04}-{:02}", date.year(), date.month());
                    *counts.entry(label).or_insert(0) += 1;
                }
            }
        }
    }

    if counts.is_empty() {
        return insufficient("no dated records to bucket");
    }

    // BTreeMap iteration gives the ascending period order for free: both
    // "YYYY" and "YYYY-MM" labels sort chronologically as strings.
    AggregateResult::Data {
        data: counts
            .into_iter()
            .map(|(period, count)| PeriodCount { period, count })
            .collect(),
    }
}

/// Counts collisions per (day-of-week, hour-of-day) cell, days ordered
/// Monday through Sunday regardless of data order. Records lacking
/// either the date or the time are excluded.
#[must_use]
pub fn by_day_hour(view: &FilteredView<'_>) -> AggregateResult<Vec<DayHourCount>> {
    if !view.columns().crash_date || !view.columns().crash_time {
        return insufficient("crash date or time column not loaded");
    }

    let mut counts: BTreeMap<(u8, u8), u64> = BTreeMap::new();
    for record in view.records() {
        let (Some(date), Some(time)) = (record.crash_date, record.crash_time) else {
            continue;
        };
        #[allow(clippy::cast_possible_truncation)]
        let day_index = date.weekday().num_days_from_monday() as u8;
        #[allow(clippy::cast_possible_truncation)]
        let hour = time.hour() as u8;
        *counts.entry((day_index, hour)).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return insufficient("no records with both crash date and time");
    }

    AggregateResult::Data {
        data: counts
            .into_iter()
            .map(|((day_index, hour), count)| DayHourCount {
                day: DAY_NAMES[usize::from(day_index)].to_string(),
                day_index,
                hour,
                count,
            })
            .collect(),
    }
}

/// Ranks the top `limit` vehicle categories by count, descending (ties
/// in canonical category order, for deterministic output). Records whose
/// vehicle type was missing ([`VehicleCategory::Unknown`]) are excluded
/// from the ranking.
#[must_use]
pub fn top_vehicle_categories(
    view: &FilteredView<'_>,
    limit: usize,
) -> AggregateResult<Vec<CategoryCount>> {
    if !view.columns().vehicle_type {
        return insufficient("vehicle type column not loaded");
    }

    let mut counts = BTreeMap::new();
    for record in view.records() {
        if record.vehicle_category != VehicleCategory::Unknown {
            *counts.entry(record.vehicle_category).or_insert(0u64) += 1;
        }
    }

    if counts.is_empty() {
        return insufficient("no recognizable vehicle types in the filtered records");
    }

    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
    rows.truncate(limit);
    AggregateResult::Data { data: rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike as _, NaiveDate, NaiveTime};
    use collision_insights_collision_models::{Borough, CollisionRecord};
    use collision_insights_dataset::Dataset;
    use collision_insights_report_models::FilterCriteria;

    fn record(
        borough: Option<Borough>,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        category: VehicleCategory,
    ) -> CollisionRecord {
        CollisionRecord {
            borough,
            crash_date: date,
            crash_time: time,
            year: date.map(|d| d.year()),
            raw_vehicle_type: None,
            vehicle_category: category,
            contributing_factor: None,
            injury_type: None,
            latitude: None,
            longitude: None,
            persons_injured: 0,
            pedestrians_injured: 0,
            cyclists_injured: 0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn view_of(records: Vec<CollisionRecord>) -> Dataset {
        Dataset::from_records(records)
    }

    #[test]
    fn borough_counts_sorted_descending() {
        let dataset = view_of(vec![
            record(Some(Borough::Queens), None, None, VehicleCategory::Car),
            record(Some(Borough::Queens), None, None, VehicleCategory::Car),
            record(Some(Borough::Bronx), None, None, VehicleCategory::Car),
        ]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());

        let rows = match by_borough(&view) {
            AggregateResult::Data { data } => data,
            AggregateResult::Insufficient { reason } => panic!("degraded: {reason}"),
        };
        assert_eq!(rows[0].borough, Borough::Queens);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].borough, Borough::Bronx);
    }

    #[test]
    fn borough_counts_degrade_without_values() {
        let dataset = view_of(vec![record(None, None, None, VehicleCategory::Car)]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());
        assert!(by_borough(&view).is_insufficient());
    }

    #[test]
    fn yearly_buckets_ascend() {
        let dataset = view_of(vec![
            record(None, Some(date(2022, 1, 1)), None, VehicleCategory::Car),
            record(None, Some(date(2019, 6, 1)), None, VehicleCategory::Car),
            record(None, Some(date(2022, 3, 5)), None, VehicleCategory::Car),
        ]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());

        let rows = by_period(&view, TimeGranularity::Yearly);
        let rows = rows.data().expect("yearly data");
        assert_eq!(rows[0].period, "2019");
        assert_eq!(rows[1].period, "2022");
        assert_eq!(rows[1].count, 2);
    }

    #[test]
    fn monthly_buckets_use_year_month_labels() {
        let dataset = view_of(vec![
            record(None, Some(date(2021, 7, 4)), None, VehicleCategory::Car),
            record(None, Some(date(2021, 7, 9)), None, VehicleCategory::Car),
            record(None, Some(date(2021, 12, 1)), None, VehicleCategory::Car),
        ]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());

        let rows = by_period(&view, TimeGranularity::Monthly);
        let rows = rows.data().expect("monthly data");
        assert_eq!(rows[0].period, "2021-07");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].period, "2021-12");
    }

    #[test]
    fn day_hour_cells_ordered_monday_first() {
        let dataset = view_of(vec![
            // 2021-07-04 was a Sunday; 2021-07-05 a Monday.
            record(
                None,
                Some(date(2021, 7, 4)),
                Some(time(9, 0)),
                VehicleCategory::Car,
            ),
            record(
                None,
                Some(date(2021, 7, 5)),
                Some(time(17, 30)),
                VehicleCategory::Car,
            ),
            record(
                None,
                Some(date(2021, 7, 5)),
                Some(time(17, 45)),
                VehicleCategory::Car,
            ),
        ]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());

        let rows = by_day_hour(&view);
        let rows = rows.data().expect("heatmap data");
        assert_eq!(rows[0].day, "Monday");
        assert_eq!(rows[0].hour, 17);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].day, "Sunday");
        assert_eq!(rows[1].day_index, 6);
    }

    #[test]
    fn day_hour_degrades_without_times() {
        let dataset = view_of(vec![record(
            None,
            Some(date(2021, 7, 4)),
            None,
            VehicleCategory::Car,
        )]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());
        assert!(by_day_hour(&view).is_insufficient());
    }

    #[test]
    fn top_categories_ranked_and_capped() {
        let dataset = view_of(vec![
            record(None, None, None, VehicleCategory::Taxi),
            record(None, None, None, VehicleCategory::Taxi),
            record(None, None, None, VehicleCategory::Suv),
            record(None, None, None, VehicleCategory::Bus),
            record(None, None, None, VehicleCategory::Unknown),
        ]);
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());

        let rows = top_vehicle_categories(&view, 2);
        let rows = rows.data().expect("category data");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, VehicleCategory::Taxi);
        assert_eq!(rows[0].count, 2);
        // Bus and Suv tie at 1; Bus precedes Suv in canonical order.
        assert_eq!(rows[1].category, VehicleCategory::Bus);
    }

    #[test]
    fn empty_view_degrades_every_aggregate() {
        let dataset = Dataset::empty();
        let view = crate::filter::apply(&dataset, &FilterCriteria::default());
        assert!(by_borough(&view).is_insufficient());
        assert!(by_period(&view, TimeGranularity::Yearly).is_insufficient());
        assert!(by_day_hour(&view).is_insufficient());
        assert!(top_vehicle_categories(&view, 5).is_insufficient());
    }
}
