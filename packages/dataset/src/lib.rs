#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV loading and the immutable in-memory collision dataset store.
//!
//! The dataset is loaded exactly once at process start and shared by
//! reference for the remainder of the process lifetime. Loading never
//! fails hard: a missing file, unreadable header, or absent column
//! degrades to an empty or partially-populated [`Dataset`] with the
//! problem logged, and every downstream operation behaves correctly on
//! zero records.

pub mod parsing;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use collision_insights_collision_models::{
    Borough, CollisionRecord, InjuryType, VehicleCategory,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column headers of the source CSV export.
pub mod columns {
    /// Borough name column.
    pub const BOROUGH: &str = "BOROUGH";
    /// Crash date column.
    pub const CRASH_DATE: &str = "CRASH DATE";
    /// Crash time column.
    pub const CRASH_TIME: &str = "CRASH TIME";
    /// Pre-derived crash year column.
    pub const YEAR: &str = "YEAR";
    /// First vehicle's free-text type column.
    pub const VEHICLE_TYPE: &str = "VEHICLE TYPE CODE 1";
    /// First vehicle's contributing factor column.
    pub const CONTRIBUTING_FACTOR: &str = "CONTRIBUTING FACTOR VEHICLE 1";
    /// Injured participant classification column.
    pub const INJURY_TYPE: &str = "INJURY_TYPE";
    /// Latitude column.
    pub const LATITUDE: &str = "LATITUDE";
    /// Longitude column.
    pub const LONGITUDE: &str = "LONGITUDE";
    /// Persons injured count column.
    pub const PERSONS_INJURED: &str = "NUMBER OF PERSONS INJURED";
    /// Pedestrians injured count column.
    pub const PEDESTRIANS_INJURED: &str = "NUMBER OF PEDESTRIANS INJURED";
    /// Cyclists injured count column.
    pub const CYCLISTS_INJURED: &str = "NUMBER OF CYCLIST INJURED";
}

/// Errors that can occur while reading the source file.
///
/// These never escape [`Dataset::load_or_empty`]; they exist so the load
/// path can use `?` internally and log one structured error at the
/// boundary.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV structure was unreadable.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Which source columns were present in the loaded file.
///
/// The filter composer skips any predicate whose source column never
/// existed, so filtering degrades to "fewer constraints applied" instead
/// of matching nothing against an all-`None` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPresence {
    /// `BOROUGH` column present.
    pub borough: bool,
    /// `CRASH DATE` column present.
    pub crash_date: bool,
    /// `CRASH TIME` column present.
    pub crash_time: bool,
    /// Either `CRASH DATE` or `YEAR` present (year is derivable).
    pub year: bool,
    /// `VEHICLE TYPE CODE 1` column present.
    pub vehicle_type: bool,
    /// `CONTRIBUTING FACTOR VEHICLE 1` column present.
    pub contributing_factor: bool,
    /// `INJURY_TYPE` column present.
    pub injury_type: bool,
    /// Both `LATITUDE` and `LONGITUDE` present.
    pub location: bool,
    /// The three injury count columns present.
    pub injury_counts: bool,
}

impl ColumnPresence {
    /// Presence value for a dataset built directly from in-memory
    /// records, where every field is considered available.
    #[must_use]
    pub const fn all_present() -> Self {
        Self {
            borough: true,
            crash_date: true,
            crash_time: true,
            year: true,
            vehicle_type: true,
            contributing_factor: true,
            injury_type: true,
            location: true,
            injury_counts: true,
        }
    }

    /// Presence value for an empty dataset (nothing loaded).
    #[must_use]
    pub const fn none_present() -> Self {
        Self {
            borough: false,
            crash_date: false,
            crash_time: false,
            year: false,
            vehicle_type: false,
            contributing_factor: false,
            injury_type: false,
            location: false,
            injury_counts: false,
        }
    }
}

/// Distinct values available for each filter facet, for populating
/// selection widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetOptions {
    /// Boroughs present in the data, canonical order.
    pub boroughs: Vec<Borough>,
    /// Years present in the data, ascending.
    pub years: Vec<i32>,
    /// Vehicle categories present in the data, canonical order.
    pub vehicle_categories: Vec<VehicleCategory>,
    /// Distinct contributing factor strings, sorted.
    pub contributing_factors: Vec<String>,
    /// Injury types present in the data, canonical order.
    pub injury_types: Vec<InjuryType>,
}

/// The immutable, shared collision dataset.
///
/// Cheap to clone: the record slice lives behind an [`Arc`] and is never
/// mutated after load. Every filtering operation produces a new derived
/// view, so the store can be shared freely across concurrent requests
/// with no locking.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[CollisionRecord]>,
    columns: ColumnPresence,
}

impl Dataset {
    /// Builds a dataset from already-normalized records, treating every
    /// column as present.
    #[must_use]
    pub fn from_records(records: Vec<CollisionRecord>) -> Self {
        Self {
            records: records.into(),
            columns: ColumnPresence::all_present(),
        }
    }

    /// An empty dataset, the degraded stand-in when loading fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: Vec::new().into(),
            columns: ColumnPresence::none_present(),
        }
    }

    /// Loads the source CSV, degrading to an empty dataset on failure.
    ///
    /// This is the only entry point the rest of the system uses; the
    /// underlying [`DatasetError`] is logged here, never propagated.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        match load_csv(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} collision records from {}",
                    dataset.len(),
                    path.display()
                );
                dataset
            }
            Err(e) => {
                log::error!(
                    "Failed to load collision data from {}: {e}. Serving an empty dataset.",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    /// The normalized records.
    #[must_use]
    pub fn records(&self) -> &[CollisionRecord] {
        &self.records
    }

    /// Which source columns the loaded file actually had.
    #[must_use]
    pub const fn columns(&self) -> ColumnPresence {
        self.columns
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Enumerates the distinct values available for each filter facet.
    #[must_use]
    pub fn facet_options(&self) -> FacetOptions {
        let mut boroughs = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut vehicle_categories = BTreeSet::new();
        let mut contributing_factors = BTreeSet::new();
        let mut injury_types = BTreeSet::new();

        for record in self.records.iter() {
            if let Some(b) = record.borough {
                boroughs.insert(b);
            }
            if let Some(y) = record.year {
                years.insert(y);
            }
            vehicle_categories.insert(record.vehicle_category);
            if let Some(ref f) = record.contributing_factor {
                contributing_factors.insert(f.clone());
            }
            if let Some(i) = record.injury_type {
                injury_types.insert(i);
            }
        }

        FacetOptions {
            boroughs: boroughs.into_iter().collect(),
            years: years.into_iter().collect(),
            vehicle_categories: vehicle_categories.into_iter().collect(),
            contributing_factors: contributing_factors.into_iter().collect(),
            injury_types: injury_types.into_iter().collect(),
        }
    }
}

/// Reads and normalizes the source CSV.
///
/// Individual malformed rows are skipped with a debug log; only a missing
/// file or unreadable header is an error (which the caller degrades to an
/// empty dataset).
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened or its header
/// cannot be parsed.
pub fn load_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let index_of = |name: &str| headers.iter().position(|h| h.trim() == name);

    let idx_borough = index_of(columns::BOROUGH);
    let idx_date = index_of(columns::CRASH_DATE);
    let idx_time = index_of(columns::CRASH_TIME);
    let idx_year = index_of(columns::YEAR);
    let idx_vehicle = index_of(columns::VEHICLE_TYPE);
    let idx_factor = index_of(columns::CONTRIBUTING_FACTOR);
    let idx_injury = index_of(columns::INJURY_TYPE);
    let idx_lat = index_of(columns::LATITUDE);
    let idx_lng = index_of(columns::LONGITUDE);
    let idx_persons = index_of(columns::PERSONS_INJURED);
    let idx_pedestrians = index_of(columns::PEDESTRIANS_INJURED);
    let idx_cyclists = index_of(columns::CYCLISTS_INJURED);

    let presence = ColumnPresence {
        borough: idx_borough.is_some(),
        crash_date: idx_date.is_some(),
        crash_time: idx_time.is_some(),
        year: idx_date.is_some() || idx_year.is_some(),
        vehicle_type: idx_vehicle.is_some(),
        contributing_factor: idx_factor.is_some(),
        injury_type: idx_injury.is_some(),
        location: idx_lat.is_some() && idx_lng.is_some(),
        injury_counts: idx_persons.is_some()
            && idx_pedestrians.is_some()
            && idx_cyclists.is_some(),
    };

    for (name, present) in [
        (columns::BOROUGH, presence.borough),
        (columns::CRASH_DATE, presence.crash_date),
        (columns::VEHICLE_TYPE, presence.vehicle_type),
        (columns::CONTRIBUTING_FACTOR, presence.contributing_factor),
        (columns::INJURY_TYPE, presence.injury_type),
    ] {
        if !present {
            log::warn!(
                "Column {name:?} missing from {}; dependent filters will be skipped",
                path.display()
            );
        }
    }

    let field = |row: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    let mut records = Vec::new();
    let mut skipped: u64 = 0;

    for (row_num, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                skipped += 1;
                log::debug!("Skipping unreadable row {row_num}: {e}");
                continue;
            }
        };

        let borough = field(&row, idx_borough).and_then(|s| s.to_uppercase().parse().ok());
        let crash_date =
            field(&row, idx_date).and_then(|s| parsing::parse_crash_date(&s));
        let crash_time =
            field(&row, idx_time).and_then(|s| parsing::parse_crash_time(&s));
        let year_column = field(&row, idx_year);
        let year = parsing::derive_year(crash_date, year_column.as_deref());
        let raw_vehicle_type = field(&row, idx_vehicle);
        let vehicle_category = VehicleCategory::from_raw(raw_vehicle_type.as_deref());
        let contributing_factor = field(&row, idx_factor);
        let injury_type = field(&row, idx_injury).and_then(|s| s.to_uppercase().parse().ok());
        let latitude = field(&row, idx_lat).and_then(|s| parsing::parse_coord(&s));
        let longitude = field(&row, idx_lng).and_then(|s| parsing::parse_coord(&s));

        let count = |idx: Option<usize>| {
            field(&row, idx).map_or(0, |s| parsing::parse_count(&s))
        };

        records.push(CollisionRecord {
            borough,
            crash_date,
            crash_time,
            year,
            raw_vehicle_type,
            vehicle_category,
            contributing_factor,
            injury_type,
            latitude,
            longitude,
            persons_injured: count(idx_persons),
            pedestrians_injured: count(idx_pedestrians),
            cyclists_injured: count(idx_cyclists),
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} unreadable rows in {}", path.display());
    }

    Ok(Dataset {
        records: records.into(),
        columns: presence,
    })
}
