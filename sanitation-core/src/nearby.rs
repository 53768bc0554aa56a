use serde::Serialize;

use crate::facility::Facility;

/// How many facilities [`nearby`] returns at most.
pub const NEARBY_LIMIT: usize = 3;

/// A ranked facility with its distance to the target, in kilometers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyFacility {
    #[serde(flatten)]
    pub facility: Facility,
    pub distance: f64,
}

/// Of the open facilities closest to `target_id`, the cleanest first.
///
/// The [`NEARBY_LIMIT`] closest open facilities (excluding the target itself)
/// are picked first, then that shortlist is reordered by descending score. Both
/// sorts are stable, so ties keep the input order. An unknown `target_id` gives
/// an empty list.
pub fn nearby(target_id: i64, facilities: &[Facility]) -> Vec<NearbyFacility> {
    let Some(target) = facilities.iter().find(|facility| facility.id == target_id) else {
        return Vec::new();
    };
    let origin = target.location();

    let mut candidates: Vec<NearbyFacility> = facilities
        .iter()
        .filter(|facility| facility.id != target_id && facility.is_open())
        .map(|facility| NearbyFacility {
            distance: origin.distance_to(&facility.location()),
            facility: facility.clone(),
        })
        .collect();

    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates.truncate(NEARBY_LIMIT);
    candidates.sort_by(|a, b| b.facility.score().cmp(&a.facility.score()));

    candidates
}
