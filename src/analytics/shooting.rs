use std::collections::BTreeMap;

use super::percentage;
use crate::models::{CourtZone, ExerciseResult, PointAccuracy, ShotPoint, ZoneAccuracy};

/// Per-side and combined percentages for one target.
///
/// For two-sided targets the combined figure is taken over both sides'
/// attempts with the make target counted once per side.
pub fn point_accuracy(point: &ShotPoint) -> PointAccuracy {
    let makes = u64::from(point.makes());
    let left = percentage(makes, u64::from(point.left_attempts()));

    if !point.both_sides {
        return PointAccuracy {
            zone: point.zone,
            left,
            right: 0,
            combined: left,
        };
    }

    let right = percentage(makes, u64::from(point.right_attempts()));
    // With no attempts on either side left is already 0.
    let combined = percentage(point.total_makes(), point.total_attempts());

    PointAccuracy {
        zone: point.zone,
        left,
        right,
        combined,
    }
}

/// Overall percentage for an exercise's full list of targets.
pub fn exercise_accuracy(points: &[ShotPoint]) -> u32 {
    let (makes, attempts) = totals(points.iter());
    percentage(makes, attempts)
}

/// Makes and attempts per court zone across a session's exercises, in zone
/// order.
pub fn zone_breakdown(results: &[ExerciseResult]) -> Vec<ZoneAccuracy> {
    let mut zones: BTreeMap<CourtZone, (u64, u64)> = BTreeMap::new();

    for point in results.iter().flat_map(|result| result.shot_points.iter()) {
        let entry = zones.entry(point.zone).or_default();
        entry.0 += point.total_makes();
        entry.1 += point.total_attempts();
    }

    zones
        .into_iter()
        .map(|(zone, (makes, attempts))| ZoneAccuracy {
            zone,
            makes,
            attempts,
            accuracy: percentage(makes, attempts),
        })
        .collect()
}

pub(crate) fn totals<'a>(points: impl Iterator<Item = &'a ShotPoint>) -> (u64, u64) {
    points.fold((0, 0), |(makes, attempts), point| {
        (makes + point.total_makes(), attempts + point.total_attempts())
    })
}
