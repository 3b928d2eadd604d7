//! Identity tracking across detection passes.
//!
//! Identities are born from the first non-empty detection list and never die
//! on their own: a robot that drifts out of focus keeps its identity and
//! snaps back as soon as a matching shape reappears. Only the operator's
//! explicit [`IdentityTracker::clear`] empties the map.

mod assign;
pub mod shape;

pub use assign::{DistanceMatrix, ExclusiveNearest, GreedyIndependent, MatchStrategy};
pub use shape::shape_distance;

use crate::coords::{CameraPoint, NormPoint};
use crate::types::{Detection, ShapeDescriptor};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Monotonic identity handle; display form `bot-<n>`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IdentityKey(u32);

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bot-{}", self.0)
    }
}

/// Matching knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Largest Hu-moment shape distance that still counts as the same robot.
    pub match_threshold: f64,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            match_threshold: 0.125,
        }
    }
}

/// One tracked robot: last accepted observation plus operator state.
#[derive(Clone, Debug, Serialize)]
pub struct TrackedIdentity {
    pub key: IdentityKey,
    /// Shape descriptor from the most recent matched detection.
    pub shape: ShapeDescriptor,
    /// Last matched center in camera pixels.
    pub center: CameraPoint,
    /// Last matched marker radius.
    pub radius: f32,
    /// Last matched heading, (-π, π].
    pub orientation: f32,
    /// Operator-assigned manual-control segment, start to end.
    path: Option<(NormPoint, NormPoint)>,
}

impl TrackedIdentity {
    pub fn path(&self) -> Option<(NormPoint, NormPoint)> {
        self.path
    }
}

/// Shape-based identity map over detection passes.
pub struct IdentityTracker {
    params: TrackerParams,
    frame_w: u32,
    frame_h: u32,
    next_key: u32,
    identities: BTreeMap<IdentityKey, TrackedIdentity>,
    strategy: Box<dyn MatchStrategy>,
}

impl IdentityTracker {
    /// Tracker over frames of the given native dimensions.
    pub fn new(params: TrackerParams, frame_w: u32, frame_h: u32) -> Self {
        Self::with_strategy(params, frame_w, frame_h, Box::new(GreedyIndependent))
    }

    /// Tracker with a non-default assignment strategy.
    pub fn with_strategy(
        params: TrackerParams,
        frame_w: u32,
        frame_h: u32,
        strategy: Box<dyn MatchStrategy>,
    ) -> Self {
        Self {
            params,
            frame_w,
            frame_h,
            next_key: 0,
            identities: BTreeMap::new(),
            strategy,
        }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn get(&self, key: IdentityKey) -> Option<&TrackedIdentity> {
        self.identities.get(&key)
    }

    /// Identities in key order.
    pub fn identities(&self) -> impl Iterator<Item = &TrackedIdentity> {
        self.identities.values()
    }

    /// Fold one detection pass into the identity map.
    ///
    /// An empty map seeds one identity per detection. A populated map matches
    /// each identity against the detections by shape distance; unmatched
    /// identities are left untouched.
    pub fn reconcile(&mut self, detections: &[Detection]) {
        if detections.is_empty() {
            return;
        }
        if self.identities.is_empty() {
            for det in detections {
                let key = self.mint_key();
                self.identities.insert(
                    key,
                    TrackedIdentity {
                        key,
                        shape: det.shape.clone(),
                        center: det.center,
                        radius: det.radius,
                        orientation: det.orientation,
                        path: None,
                    },
                );
            }
            debug!("tracker seeded {} identities", detections.len());
            return;
        }

        let keys: Vec<IdentityKey> = self.identities.keys().copied().collect();
        let mut distances = DistanceMatrix::new(keys.len(), detections.len());
        for (row, key) in keys.iter().enumerate() {
            let identity = &self.identities[key];
            for (col, det) in detections.iter().enumerate() {
                distances.set(row, col, shape_distance(&identity.shape.hu, &det.shape.hu));
            }
        }
        let assignment = self.strategy.assign(&distances, self.params.match_threshold);

        let mut matched = 0usize;
        for (row, key) in keys.iter().enumerate() {
            let Some(col) = assignment[row] else {
                continue;
            };
            let det = &detections[col];
            if let Some(identity) = self.identities.get_mut(key) {
                identity.shape = det.shape.clone();
                identity.center = det.center;
                identity.radius = det.radius;
                identity.orientation = det.orientation;
                matched += 1;
            }
        }
        debug!(
            "tracker reconciled: {} of {} identities matched against {} detections",
            matched,
            keys.len(),
            detections.len()
        );
    }

    /// Drop every identity, including operator paths.
    pub fn clear(&mut self) {
        self.identities.clear();
    }

    /// Identity whose last center is closest to a normalized click point.
    pub fn nearest_identity(&self, click: NormPoint) -> Option<IdentityKey> {
        let mut best: Option<(IdentityKey, f32)> = None;
        for identity in self.identities.values() {
            let center = identity.center.to_norm(self.frame_w, self.frame_h);
            let d = click.distance_to(center);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((identity.key, d));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Assign a manual-control segment; `false` for an unknown key.
    pub fn set_path(&mut self, key: IdentityKey, path: (NormPoint, NormPoint)) -> bool {
        match self.identities.get_mut(&key) {
            Some(identity) => {
                identity.path = Some(path);
                true
            }
            None => false,
        }
    }

    /// Consume the manual-control segment, if one was assigned.
    pub fn take_path(&mut self, key: IdentityKey) -> Option<(NormPoint, NormPoint)> {
        self.identities.get_mut(&key).and_then(|id| id.path.take())
    }

    fn mint_key(&mut self) -> IdentityKey {
        self.next_key += 1;
        IdentityKey(self.next_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(x: f32, y: f32, hu: [f64; 7]) -> Detection {
        Detection {
            center: CameraPoint::new(x, y),
            radius: 20.0,
            orientation: 0.0,
            shape: ShapeDescriptor {
                hu,
                contour: Vec::new(),
            },
        }
    }

    const ROUND: [f64; 7] = [0.18, 0.001, 1e-5, 1e-6, 1e-12, 1e-8, 1e-12];
    const SPIKY: [f64; 7] = [0.35, 0.02, 1e-3, 1e-4, 1e-8, 1e-5, 1e-8];

    #[test]
    fn seeding_mints_monotonic_keys() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        assert!(tracker.is_empty());
        tracker.reconcile(&[detection(100.0, 100.0, ROUND), detection(300.0, 200.0, SPIKY)]);
        assert_eq!(tracker.len(), 2);
        let keys: Vec<_> = tracker.identities().map(|id| id.key).collect();
        assert!(keys[0] < keys[1]);
        assert_eq!(keys[0].to_string(), "bot-1");
        assert_eq!(keys[1].to_string(), "bot-2");
    }

    #[test]
    fn empty_detections_change_nothing() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        tracker.reconcile(&[detection(100.0, 100.0, ROUND)]);
        tracker.reconcile(&[]);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn matched_identity_updates_in_place() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        tracker.reconcile(&[detection(100.0, 100.0, ROUND)]);
        let key = tracker.identities().next().unwrap().key;

        tracker.reconcile(&[detection(112.0, 96.0, ROUND)]);
        assert_eq!(tracker.len(), 1);
        let identity = tracker.get(key).unwrap();
        assert_eq!(identity.center.x, 112.0);
        assert_eq!(identity.center.y, 96.0);
    }

    #[test]
    fn unmatched_identity_survives_and_snaps_back() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        tracker.reconcile(&[detection(100.0, 100.0, ROUND), detection(300.0, 200.0, SPIKY)]);

        // The spiky robot disappears for one pass.
        tracker.reconcile(&[detection(105.0, 101.0, ROUND)]);
        assert_eq!(tracker.len(), 2, "no automatic identity death");
        let spiky_key = tracker
            .identities()
            .find(|id| id.center.x == 300.0)
            .unwrap()
            .key;

        // It returns somewhere else; shape matching reclaims it.
        tracker.reconcile(&[detection(104.0, 102.0, ROUND), detection(420.0, 260.0, SPIKY)]);
        let spiky = tracker.get(spiky_key).unwrap();
        assert_eq!(spiky.center.x, 420.0);
    }

    #[test]
    fn match_count_grows_with_threshold() {
        let mut counts = Vec::new();
        for threshold in [1e-6, 0.5, 10.0] {
            let params = TrackerParams {
                match_threshold: threshold,
            };
            let mut tracker = IdentityTracker::new(params, 640, 480);
            tracker.reconcile(&[detection(100.0, 100.0, ROUND)]);
            // Slightly different shape at another spot.
            tracker.reconcile(&[detection(250.0, 150.0, SPIKY)]);
            let moved = tracker.identities().next().unwrap().center.x == 250.0;
            counts.push(u32::from(moved));
        }
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(counts[0], 0, "tiny threshold must not match");
        assert_eq!(counts[2], 1, "huge threshold must match");
    }

    #[test]
    fn clear_is_total() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        tracker.reconcile(&[detection(100.0, 100.0, ROUND)]);
        tracker.clear();
        assert!(tracker.is_empty());
        // Next pass re-seeds from scratch.
        tracker.reconcile(&[detection(50.0, 60.0, ROUND)]);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn nearest_identity_uses_normalized_distance() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        tracker.reconcile(&[detection(64.0, 48.0, ROUND), detection(576.0, 432.0, SPIKY)]);
        let near_origin = tracker.nearest_identity(NormPoint::new(0.12, 0.11)).unwrap();
        assert_eq!(tracker.get(near_origin).unwrap().center.x, 64.0);
        let near_far = tracker.nearest_identity(NormPoint::new(0.95, 0.95)).unwrap();
        assert_eq!(tracker.get(near_far).unwrap().center.x, 576.0);
        assert!(tracker.nearest_identity(NormPoint::new(0.5, 0.5)).is_some());
    }

    #[test]
    fn paths_are_set_and_taken_once() {
        let mut tracker = IdentityTracker::new(TrackerParams::default(), 640, 480);
        tracker.reconcile(&[detection(100.0, 100.0, ROUND)]);
        let key = tracker.identities().next().unwrap().key;
        let path = (NormPoint::new(0.1, 0.2), NormPoint::new(0.8, 0.9));
        assert!(tracker.set_path(key, path));
        assert_eq!(tracker.take_path(key), Some(path));
        assert_eq!(tracker.take_path(key), None);
        assert!(!tracker.set_path(IdentityKey(999), path));
    }

    #[test]
    fn exclusive_strategy_plugs_in() {
        let mut tracker = IdentityTracker::with_strategy(
            TrackerParams::default(),
            640,
            480,
            Box::new(ExclusiveNearest),
        );
        // Two identical-shape identities, one detection: only one may claim it.
        tracker.reconcile(&[detection(100.0, 100.0, ROUND), detection(300.0, 200.0, ROUND)]);
        tracker.reconcile(&[detection(150.0, 120.0, ROUND)]);
        let at_150 = tracker
            .identities()
            .filter(|id| id.center.x == 150.0)
            .count();
        assert_eq!(at_150, 1);

        // The default strategy lets both claim it.
        let mut greedy = IdentityTracker::new(TrackerParams::default(), 640, 480);
        greedy.reconcile(&[detection(100.0, 100.0, ROUND), detection(300.0, 200.0, ROUND)]);
        greedy.reconcile(&[detection(150.0, 120.0, ROUND)]);
        let at_150 = greedy
            .identities()
            .filter(|id| id.center.x == 150.0)
            .count();
        assert_eq!(at_150, 2);
    }
}
