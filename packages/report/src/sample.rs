//! Deterministic location sampling for map rendering.
//!
//! Plotting every record is a rendering cost problem, not a correctness
//! one, so the map view draws a bounded reservoir sample of records with
//! plausible coordinates. The sample is driven by a seeded deterministic
//! generator: the same filtered view and seed always produce the same
//! points, which keeps report output reproducible across requests.

use collision_insights_report_models::{AggregateResult, MapPoint};

use crate::filter::FilteredView;

/// Default cap on sampled points.
pub const DEFAULT_SAMPLE_CAP: usize = 5000;

/// Default sampling seed.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// `SplitMix64` — a tiny deterministic generator, sufficient for
/// unbiased reservoir index selection. (Sequence quality requirements
/// here are minimal; reproducibility is the point.)
struct SplitMix64(u64);

impl SplitMix64 {
    const fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Draws up to `cap` map points from the view's records with plausible
/// coordinates, via Algorithm R reservoir sampling.
///
/// Degrades to `Insufficient` when the coordinate columns are missing or
/// no record has a plausible location.
#[must_use]
pub fn location_sample(
    view: &FilteredView<'_>,
    cap: usize,
    seed: u64,
) -> AggregateResult<Vec<MapPoint>> {
    if !view.columns().location {
        return AggregateResult::Insufficient {
            reason: "coordinate columns not loaded".to_string(),
        };
    }
    if cap == 0 {
        return AggregateResult::Insufficient {
            reason: "sample size is zero".to_string(),
        };
    }

    let mut rng = SplitMix64::new(seed);
    let mut reservoir: Vec<MapPoint> = Vec::with_capacity(cap.min(view.len()));
    let mut seen: u64 = 0;

    for record in view.records() {
        let Some((latitude, longitude)) = record.plausible_location() else {
            continue;
        };
        let point = MapPoint {
            latitude,
            longitude,
            persons_injured: record.persons_injured,
        };

        seen += 1;
        if reservoir.len() < cap {
            reservoir.push(point);
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let slot = (rng.next() % seen) as usize;
            if slot < cap {
                reservoir[slot] = point;
            }
        }
    }

    if reservoir.is_empty() {
        return AggregateResult::Insufficient {
            reason: "no records with plausible coordinates".to_string(),
        };
    }

    AggregateResult::Data { data: reservoir }
}
