//! Filter composition over the collision dataset.
//!
//! Applies the facets of a [`FilterCriteria`] as conjunctive predicates
//! over the immutable dataset, producing a borrowed [`FilteredView`].
//! A predicate whose facet is empty, or whose source column was missing
//! from the loaded file, is skipped entirely — filtering degrades to
//! "fewer constraints applied" rather than erroring or matching nothing.

use collision_insights_collision_models::CollisionRecord;
use collision_insights_dataset::{ColumnPresence, Dataset};
use collision_insights_report_models::{FilterCriteria, SummaryStats};

/// A filtered, read-only view over the dataset.
///
/// Borrows the records it matched; the underlying dataset is never
/// mutated. An empty view is a valid, first-class "no matches" outcome.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a CollisionRecord>,
    columns: ColumnPresence,
}

impl<'a> FilteredView<'a> {
    /// The matching records.
    #[must_use]
    pub fn records(&self) -> &[&'a CollisionRecord] {
        &self.records
    }

    /// Which source columns the underlying dataset has.
    #[must_use]
    pub const fn columns(&self) -> ColumnPresence {
        self.columns
    }

    /// Number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the filters matched zero records — the explicit
    /// "no results" signal the presentation layer must render distinctly.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Applies further criteria to an already-filtered view.
    ///
    /// Because all predicates are conjunctive, refining with criteria
    /// split across several calls yields the same view as one combined
    /// [`apply`], in any order.
    #[must_use]
    pub fn refine(&self, criteria: &FilterCriteria) -> Self {
        Self {
            records: self
                .records
                .iter()
                .copied()
                .filter(|record| matches(record, criteria, self.columns))
                .collect(),
            columns: self.columns,
        }
    }

    /// Headline totals over the matching records.
    #[must_use]
    pub fn summary(&self) -> SummaryStats {
        let mut stats = SummaryStats {
            total_crashes: self.records.len() as u64,
            ..SummaryStats::default()
        };
        for record in &self.records {
            stats.persons_injured += u64::from(record.persons_injured);
            stats.pedestrians_injured += u64::from(record.pedestrians_injured);
            stats.cyclists_injured += u64::from(record.cyclists_injured);
        }
        stats
    }
}

/// Applies the criteria's facets conjunctively over the full dataset.
///
/// Facet order matches the report contract (borough, year, vehicle
/// category, contributing factor, injury type), though conjunction makes
/// the order observationally irrelevant.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let columns = dataset.columns();
    log_skipped_predicates(criteria, columns);

    FilteredView {
        records: dataset
            .records()
            .iter()
            .filter(|record| matches(record, criteria, columns))
            .collect(),
        columns,
    }
}

/// Whether one record satisfies every active predicate.
fn matches(record: &CollisionRecord, criteria: &FilterCriteria, columns: ColumnPresence) -> bool {
    if columns.borough
        && !criteria.boroughs.is_empty()
        && !record.borough.is_some_and(|b| criteria.boroughs.contains(&b))
    {
        return false;
    }

    if columns.year
        && !criteria.years.is_empty()
        && !record.year.is_some_and(|y| criteria.years.contains(&y))
    {
        return false;
    }

    if columns.vehicle_type
        && !criteria.vehicle_categories.is_empty()
        && !criteria.vehicle_categories.contains(&record.vehicle_category)
    {
        return false;
    }

    if columns.contributing_factor && !criteria.contributing_factors.is_empty() {
        let matched = record.contributing_factor.as_deref().is_some_and(|factor| {
            criteria
                .contributing_factors
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(factor))
        });
        if !matched {
            return false;
        }
    }

    if columns.injury_type
        && !criteria.injury_types.is_empty()
        && !record
            .injury_type
            .is_some_and(|i| criteria.injury_types.contains(&i))
    {
        return false;
    }

    true
}

fn log_skipped_predicates(criteria: &FilterCriteria, columns: ColumnPresence) {
    for (facet, active, present) in [
        ("borough", !criteria.boroughs.is_empty(), columns.borough),
        ("year", !criteria.years.is_empty(), columns.year),
        (
            "vehicle category",
            !criteria.vehicle_categories.is_empty(),
            columns.vehicle_type,
        ),
        (
            "contributing factor",
            !criteria.contributing_factors.is_empty(),
            columns.contributing_factor,
        ),
        (
            "injury type",
            !criteria.injury_types.is_empty(),
            columns.injury_type,
        ),
    ] {
        if active && !present {
            log::debug!("Skipping {facet} filter: source column not loaded");
        }
    }
}
