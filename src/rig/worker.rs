//! Camera acquisition loop and the shared state it feeds.

use crate::calib::CalibrationTable;
use crate::coords::{NormPoint, ProjectorPoint};
use crate::detect::ObjectExtractor;
use crate::frame::Mask;
use crate::rig::hardware::{Camera, FrameSink};
use crate::track::{IdentityKey, IdentityTracker};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// Acquisition loop knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RigParams {
    /// Run the detection pipeline on every Nth acquired frame.
    pub detect_every: usize,
    /// Whether detection is active when the worker starts.
    pub detect_on_start: bool,
    /// Exposure to program into the camera before the loop starts.
    pub exposure_ms: Option<f32>,
}

impl Default for RigParams {
    fn default() -> Self {
        Self {
            detect_every: 5,
            detect_on_start: true,
            exposure_ms: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    Running,
    /// Pause requested; the worker finishes the in-flight frame first.
    DrainRequested,
    Paused,
    Stopping,
}

struct ControlState {
    run: RunState,
    detection_enabled: bool,
}

/// Mutex+Condvar pair the loop and the UI side rendezvous on.
struct Control {
    state: Mutex<ControlState>,
    cond: Condvar,
}

/// Detection state shared between the loop and the UI side.
struct SharedState {
    tracker: Mutex<IdentityTracker>,
    overlay: Mutex<Option<Mask>>,
}

/// Owns the camera thread and hands the UI side a control surface.
///
/// The loop grabs frames, runs detection on every Nth one and presents each
/// frame to the sink with the current overlay. Pausing is a drain handshake:
/// the caller asks, the loop finishes its in-flight frame, acknowledges and
/// parks. That makes [`AcquisitionWorker::pause`] a barrier the UI can rely
/// on when it resizes output surfaces, and it is what makes
/// [`AcquisitionWorker::set_detection`]`(false)` a total cancellation: no
/// detection result can land after the clear.
pub struct AcquisitionWorker {
    control: Arc<Control>,
    shared: Arc<SharedState>,
    calibration: Option<CalibrationTable>,
    join: Option<JoinHandle<()>>,
}

impl AcquisitionWorker {
    /// Program the camera and start the acquisition thread.
    pub fn spawn<C, S>(
        mut camera: C,
        sink: S,
        extractor: ObjectExtractor,
        tracker: IdentityTracker,
        calibration: Option<CalibrationTable>,
        params: RigParams,
    ) -> Result<Self, String>
    where
        C: Camera + 'static,
        S: FrameSink + 'static,
    {
        if let Some(ms) = params.exposure_ms {
            camera
                .set_exposure(ms)
                .map_err(|err| format!("camera exposure setup failed: {err}"))?;
        }
        let control = Arc::new(Control {
            state: Mutex::new(ControlState {
                run: RunState::Running,
                detection_enabled: params.detect_on_start,
            }),
            cond: Condvar::new(),
        });
        let shared = Arc::new(SharedState {
            tracker: Mutex::new(tracker),
            overlay: Mutex::new(None),
        });

        let loop_control = Arc::clone(&control);
        let loop_shared = Arc::clone(&shared);
        let detect_every = params.detect_every.max(1);
        let join = thread::Builder::new()
            .name("acquisition".into())
            .spawn(move || {
                run_loop(camera, sink, extractor, loop_control, loop_shared, detect_every);
            })
            .map_err(|err| format!("failed to spawn acquisition thread: {err}"))?;

        Ok(Self {
            control,
            shared,
            calibration,
            join: Some(join),
        })
    }

    /// Tracker shared with the loop. UI-side reads (click handling, path
    /// bookkeeping) take this lock.
    pub fn tracker(&self) -> &Mutex<IdentityTracker> {
        &self.shared.tracker
    }

    /// Overlay mask shared with the loop; `None` while detection is off.
    pub fn overlay(&self) -> &Mutex<Option<Mask>> {
        &self.shared.overlay
    }

    pub fn detection_enabled(&self) -> bool {
        self.control.state.lock().unwrap().detection_enabled
    }

    /// Block until the loop finishes its in-flight frame and parks.
    ///
    /// No-op when the loop is already paused or stopping.
    pub fn pause(&self) {
        self.drain();
    }

    /// Wake a paused loop.
    pub fn resume(&self) {
        let mut st = self.control.state.lock().unwrap();
        if st.run == RunState::Paused {
            st.run = RunState::Running;
            self.control.cond.notify_all();
        }
    }

    /// Toggle the detection pipeline.
    ///
    /// Switching off drains the loop first, then clears the identity map and
    /// the overlay. When this returns with `enabled == false`, both are empty
    /// and will stay empty until detection is switched back on.
    pub fn set_detection(&self, enabled: bool) {
        if enabled {
            self.control.state.lock().unwrap().detection_enabled = true;
            return;
        }
        let initiated = self.drain();
        self.control.state.lock().unwrap().detection_enabled = false;
        self.shared.tracker.lock().unwrap().clear();
        *self.shared.overlay.lock().unwrap() = None;
        debug!("detection disabled, identity map and overlay cleared");
        if initiated {
            self.resume();
        }
    }

    /// Identity whose last seen center is closest to a normalized click.
    pub fn nearest_identity(&self, click: NormPoint) -> Option<IdentityKey> {
        self.shared.tracker.lock().unwrap().nearest_identity(click)
    }

    /// Projector coordinates for a normalized target point.
    ///
    /// Returns `None` without a calibration table or when the point falls
    /// outside the calibrated region.
    pub fn projector_target(&self, target: NormPoint) -> Option<ProjectorPoint> {
        let table = self.calibration.as_ref()?;
        if !table.contains(target) {
            return None;
        }
        let camera = target.to_camera(table.width(), table.height());
        Some(table.to_projector(camera))
    }

    /// Stop the loop and join the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Move to `Paused` if the loop is running; wait out someone else's
    /// drain otherwise. Returns whether this call initiated the pause.
    fn drain(&self) -> bool {
        let mut st = self.control.state.lock().unwrap();
        let initiated = if st.run == RunState::Running {
            st.run = RunState::DrainRequested;
            true
        } else {
            false
        };
        while st.run == RunState::DrainRequested {
            st = self.control.cond.wait(st).unwrap();
        }
        initiated
    }

    fn shutdown(&mut self) {
        {
            let mut st = self.control.state.lock().unwrap();
            st.run = RunState::Stopping;
            self.control.cond.notify_all();
        }
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!("acquisition thread panicked");
            }
        }
    }
}

impl Drop for AcquisitionWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop<C, S>(
    mut camera: C,
    mut sink: S,
    mut extractor: ObjectExtractor,
    control: Arc<Control>,
    shared: Arc<SharedState>,
    detect_every: usize,
) where
    C: Camera,
    S: FrameSink,
{
    debug!("acquisition loop started, detecting every {detect_every} frames");
    // Starts saturated so the first frame after enabling detects right away.
    let mut since_detect = detect_every;
    loop {
        let detection_enabled = {
            let mut st = control.state.lock().unwrap();
            loop {
                match st.run {
                    RunState::Stopping => {
                        debug!("acquisition loop stopped");
                        return;
                    }
                    RunState::DrainRequested => {
                        st.run = RunState::Paused;
                        control.cond.notify_all();
                        debug!("acquisition loop drained");
                    }
                    RunState::Paused => {
                        st = control.cond.wait(st).unwrap();
                    }
                    RunState::Running => break,
                }
            }
            st.detection_enabled
        };

        let frame = match camera.next_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!("camera frame grab failed: {err}");
                continue;
            }
        };

        if detection_enabled && since_detect >= detect_every {
            since_detect = 1;
            let result = extractor.extract(&frame.as_view());
            shared
                .tracker
                .lock()
                .unwrap()
                .reconcile(&result.detections);
            *shared.overlay.lock().unwrap() = Some(result.overlay);
        } else {
            since_detect += 1;
        }

        let overlay = shared.overlay.lock().unwrap();
        sink.present(&frame, overlay.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calib::CalibRect;
    use crate::track::TrackerParams;

    #[test]
    fn default_params() {
        let params = RigParams::default();
        assert_eq!(params.detect_every, 5);
        assert!(params.detect_on_start);
        assert!(params.exposure_ms.is_none());
    }

    fn handle_with_table(table: Option<CalibrationTable>) -> AcquisitionWorker {
        AcquisitionWorker {
            control: Arc::new(Control {
                state: Mutex::new(ControlState {
                    run: RunState::Stopping,
                    detection_enabled: false,
                }),
                cond: Condvar::new(),
            }),
            shared: Arc::new(SharedState {
                tracker: Mutex::new(IdentityTracker::new(TrackerParams::default(), 4, 4)),
                overlay: Mutex::new(None),
            }),
            calibration: table,
            join: None,
        }
    }

    #[test]
    fn projector_target_checks_bounds_first() {
        let mut map = Vec::new();
        for y in 0..4u32 {
            for x in 0..4u32 {
                map.push([(x * 100) as f32, (y * 100) as f32]);
            }
        }
        let table = CalibrationTable::from_parts(
            4,
            4,
            map,
            CalibRect {
                min: NormPoint::new(0.25, 0.25),
                max: NormPoint::new(0.75, 0.75),
            },
        )
        .unwrap();

        let worker = handle_with_table(Some(table));
        // Inside bounds: norm (0.5, 0.5) -> camera (2, 2) -> table entry.
        assert_eq!(
            worker.projector_target(NormPoint::new(0.5, 0.5)),
            Some(ProjectorPoint::new(200, 200))
        );
        // Outside the calibrated region.
        assert_eq!(worker.projector_target(NormPoint::new(0.1, 0.5)), None);
        // No table at all.
        let bare = handle_with_table(None);
        assert_eq!(bare.projector_target(NormPoint::new(0.5, 0.5)), None);
    }

    #[test]
    fn bounds_check_uses_normalized_space() {
        let table = CalibrationTable::from_parts(
            2,
            2,
            vec![[0.0, 0.0]; 4],
            CalibRect {
                min: NormPoint::new(0.0, 0.0),
                max: NormPoint::new(1.0, 1.0),
            },
        )
        .unwrap();
        let worker = handle_with_table(Some(table));
        // Full-frame bounds accept every normalized point in [0, 1].
        assert!(worker.projector_target(NormPoint::new(0.0, 1.0)).is_some());
        assert!(worker.projector_target(NormPoint::new(1.01, 0.5)).is_none());
    }
}
