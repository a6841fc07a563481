//! Reduced-Motion Adaptation
//!
//! Decides a single `should_reduce_motion` flag shared by every animated
//! surface. Three signals are OR-ed together:
//!
//! - **OS preference**: re-evaluated whenever the host reports a change
//! - **Device capability**: probed once at startup; low memory or few cores
//!   count as a low-end device
//! - **Host override**: set explicitly by the hosting surface
//!
//! # Environment Variable Detection
//!
//! Terminals have no media query, so the OS preference is read from
//! `REDUCE_MOTION`:
//! - `1`, `true`, `yes`, `reduced` -> reduced
//! - `none`, `static`, `off`, `2` -> reduced
//! - Unset or other values -> full motion
//!
//! # Context Passing
//!
//! [`MotionAdaptation`] is the single writer. Components receive a cloned
//! [`MotionHandle`] (backed by a `tokio::sync::watch` channel) and read the
//! current decision on every render. There is no global flag.
//!
//! # Example
//!
//! ```ignore
//! use predictor_core::motion::{MotionAdaptation, SystemProbe, Entrance};
//!
//! let adaptation = MotionAdaptation::detect(&SystemProbe);
//! let handle = adaptation.handle();
//!
//! let entrance = handle.adapt(Entrance::result_card());
//! // Reduced motion: a single settled frame
//! let frames = entrance.frames(60);
//! ```

use std::env;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

/// Minimum memory, in GB, of a capable device
pub const MIN_CAPABLE_MEMORY_GB: f64 = 4.0;

/// Minimum logical core count of a capable device
pub const MIN_CAPABLE_CORES: usize = 4;

// ============================================================================
// OS preference
// ============================================================================

/// Read the OS-level reduced motion preference from `REDUCE_MOTION`
#[must_use]
pub fn detect_os_reduced_motion() -> bool {
    match env::var("REDUCE_MOTION") {
        Ok(value) => parse_reduce_motion(&value),
        Err(_) => false,
    }
}

/// Parse a `REDUCE_MOTION` value
///
/// Used internally by `detect_os_reduced_motion()` but exposed for testing.
#[must_use]
pub fn parse_reduce_motion(value: &str) -> bool {
    matches!(
        value.to_lowercase().trim(),
        "1" | "true" | "yes" | "reduced" | "none" | "static" | "off" | "2"
    )
}

// ============================================================================
// Device capability
// ============================================================================

/// Failure to read a device signal
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The platform does not expose this signal
    #[error("{0} is not available on this platform")]
    Unavailable(&'static str),
    /// Reading the signal failed
    #[error("failed to read device signal: {0}")]
    Io(#[from] std::io::Error),
    /// The signal was present but unreadable
    #[error("malformed device signal: {0}")]
    Malformed(String),
}

/// Source of coarse device signals
pub trait DeviceProbe {
    /// Approximate installed memory in gigabytes
    fn memory_gb(&self) -> Result<f64, ProbeError>;

    /// Logical core count
    fn logical_cores(&self) -> Result<usize, ProbeError>;
}

/// Probe backed by the operating system
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProbe;

impl DeviceProbe for SystemProbe {
    #[cfg(target_os = "linux")]
    fn memory_gb(&self) -> Result<f64, ProbeError> {
        let meminfo = std::fs::read_to_string("/proc/meminfo")?;
        parse_meminfo_total_gb(&meminfo)
    }

    #[cfg(not(target_os = "linux"))]
    fn memory_gb(&self) -> Result<f64, ProbeError> {
        Err(ProbeError::Unavailable("device memory"))
    }

    fn logical_cores(&self) -> Result<usize, ProbeError> {
        Ok(std::thread::available_parallelism()?.get())
    }
}

/// Extract `MemTotal` from `/proc/meminfo` content, in GB
fn parse_meminfo_total_gb(meminfo: &str) -> Result<f64, ProbeError> {
    let line = meminfo
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .ok_or_else(|| ProbeError::Malformed("MemTotal missing".to_string()))?;

    let kib: f64 = line
        .split_whitespace()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ProbeError::Malformed(line.to_string()))?;

    Ok(kib / (1024.0 * 1024.0))
}

/// Result of the startup probe; unknown signals stay `None`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceCapability {
    /// Memory in GB, if readable
    pub memory_gb: Option<f64>,
    /// Logical cores, if readable
    pub logical_cores: Option<usize>,
}

impl DeviceCapability {
    /// Probe once, best-effort
    ///
    /// A failed read leaves that signal unknown; unknown signals count as
    /// capable.
    pub fn probe(probe: &dyn DeviceProbe) -> Self {
        let memory_gb = probe
            .memory_gb()
            .map_err(|e| tracing::debug!(error = %e, "Device memory unavailable"))
            .ok();
        let logical_cores = probe
            .logical_cores()
            .map_err(|e| tracing::debug!(error = %e, "Core count unavailable"))
            .ok();

        Self {
            memory_gb,
            logical_cores,
        }
    }

    /// Whether a known signal falls under the capability threshold
    #[must_use]
    pub fn is_low_end(&self) -> bool {
        self.memory_gb.is_some_and(|gb| gb < MIN_CAPABLE_MEMORY_GB)
            || self.logical_cores.is_some_and(|n| n < MIN_CAPABLE_CORES)
    }
}

// ============================================================================
// Shared decision
// ============================================================================

/// The three inputs to the motion decision
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionSignals {
    /// OS prefers reduced motion
    pub os_prefers_reduced: bool,
    /// Startup probe found a low-end device
    pub low_end_device: bool,
    /// Host surface forced reduced motion
    pub host_override: bool,
}

impl MotionSignals {
    /// Any signal disables animation
    #[must_use]
    pub fn should_reduce_motion(&self) -> bool {
        self.os_prefers_reduced || self.low_end_device || self.host_override
    }
}

/// Owner of the motion signals
///
/// Hands out [`MotionHandle`]s to readers; only this type can change them.
#[derive(Debug)]
pub struct MotionAdaptation {
    tx: watch::Sender<MotionSignals>,
}

impl MotionAdaptation {
    /// Create from an OS preference and a probed device
    #[must_use]
    pub fn new(os_prefers_reduced: bool, device: DeviceCapability) -> Self {
        let signals = MotionSignals {
            os_prefers_reduced,
            low_end_device: device.is_low_end(),
            host_override: false,
        };
        tracing::debug!(?signals, ?device, "Motion signals initialised");
        let (tx, _rx) = watch::channel(signals);
        Self { tx }
    }

    /// Read the environment and probe the device
    #[must_use]
    pub fn detect(probe: &dyn DeviceProbe) -> Self {
        Self::new(detect_os_reduced_motion(), DeviceCapability::probe(probe))
    }

    /// Skip the device probe; used when probing is disabled in config
    #[must_use]
    pub fn without_probe(os_prefers_reduced: bool) -> Self {
        Self::new(os_prefers_reduced, DeviceCapability::default())
    }

    /// A read handle for a component
    #[must_use]
    pub fn handle(&self) -> MotionHandle {
        MotionHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Current signals
    #[must_use]
    pub fn signals(&self) -> MotionSignals {
        *self.tx.borrow()
    }

    /// OS preference changed
    pub fn set_os_preference(&self, prefers_reduced: bool) {
        self.update(|s| s.os_prefers_reduced = prefers_reduced);
    }

    /// Host forces (or releases) reduced motion
    pub fn set_override(&self, reduce: bool) {
        self.update(|s| s.host_override = reduce);
    }

    fn update(&self, apply: impl FnOnce(&mut MotionSignals)) {
        self.tx.send_if_modified(|signals| {
            let before = *signals;
            apply(signals);
            let changed = before != *signals;
            if changed {
                tracing::debug!(
                    reduce = signals.should_reduce_motion(),
                    "Motion signals changed"
                );
            }
            changed
        });
    }
}

/// Read-only view of the motion decision
#[derive(Clone, Debug)]
pub struct MotionHandle {
    rx: watch::Receiver<MotionSignals>,
}

impl MotionHandle {
    /// A handle with a fixed decision and no writer
    #[must_use]
    pub fn fixed(reduce: bool) -> Self {
        let (_tx, rx) = watch::channel(MotionSignals {
            host_override: reduce,
            ..MotionSignals::default()
        });
        Self { rx }
    }

    /// Whether animated surfaces must render their final state immediately
    #[must_use]
    pub fn should_reduce_motion(&self) -> bool {
        self.rx.borrow().should_reduce_motion()
    }

    /// Current signals
    #[must_use]
    pub fn signals(&self) -> MotionSignals {
        *self.rx.borrow()
    }

    /// Wait until the writer changes the signals
    ///
    /// Returns `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Bind an entrance animation to the current decision
    #[must_use]
    pub fn adapt(&self, entrance: Entrance) -> AdaptedEntrance {
        AdaptedEntrance {
            entrance,
            reduced: self.should_reduce_motion(),
        }
    }
}

// ============================================================================
// Entrance animations
// ============================================================================

/// Visual properties an entrance animates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    /// 0.0 transparent to 1.0 opaque
    pub opacity: f32,
    /// Vertical offset in pixels (positive is below the resting place)
    pub offset_y: f32,
    /// Uniform scale
    pub scale: f32,
}

impl VisualState {
    /// Resting state every entrance ends in
    pub const SETTLED: VisualState = VisualState {
        opacity: 1.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    fn lerp(from: VisualState, to: VisualState, t: f32) -> VisualState {
        VisualState {
            opacity: from.opacity + (to.opacity - from.opacity) * t,
            offset_y: from.offset_y + (to.offset_y - from.offset_y) * t,
            scale: from.scale + (to.scale - from.scale) * t,
        }
    }
}

/// An entrance from a starting state to [`VisualState::SETTLED`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entrance {
    /// Where the element starts
    pub from: VisualState,
    /// Time spent moving
    pub duration: Duration,
    /// Time held at `from` before moving
    pub delay: Duration,
}

impl Entrance {
    /// Whole page fades in
    #[must_use]
    pub fn page() -> Self {
        Self {
            from: VisualState {
                opacity: 0.0,
                ..VisualState::SETTLED
            },
            duration: Duration::from_millis(500),
            delay: Duration::ZERO,
        }
    }

    /// Request form rises into place
    #[must_use]
    pub fn form() -> Self {
        Self {
            from: VisualState {
                opacity: 0.0,
                offset_y: 20.0,
                scale: 1.0,
            },
            duration: Duration::from_millis(500),
            delay: Duration::from_millis(200),
        }
    }

    /// Result card scales in
    #[must_use]
    pub fn result_card() -> Self {
        Self {
            from: VisualState {
                opacity: 0.0,
                offset_y: 0.0,
                scale: 0.95,
            },
            duration: Duration::from_millis(500),
            delay: Duration::ZERO,
        }
    }

    /// Recommendation panel rises after the result card
    #[must_use]
    pub fn recommendation_panel() -> Self {
        Self {
            from: VisualState {
                opacity: 0.0,
                offset_y: 20.0,
                scale: 1.0,
            },
            duration: Duration::from_millis(500),
            delay: Duration::from_millis(300),
        }
    }

    /// Delay plus duration
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.delay + self.duration
    }

    /// State `elapsed` after the entrance started (ease-out cubic)
    #[must_use]
    pub fn state_at(&self, elapsed: Duration) -> VisualState {
        if elapsed <= self.delay {
            return self.from;
        }
        if self.duration.is_zero() {
            return VisualState::SETTLED;
        }
        let t = ((elapsed - self.delay).as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        VisualState::lerp(self.from, VisualState::SETTLED, eased)
    }

    /// Sampled frames at `fps`, first frame at t=0, last frame settled
    #[must_use]
    pub fn frames(&self, fps: u32) -> Vec<VisualState> {
        let fps = fps.max(1);
        let total = self.total_duration().as_secs_f32();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = (total * fps as f32).ceil() as u32;

        let mut frames: Vec<VisualState> = (0..count)
            .map(|i| self.state_at(Duration::from_secs_f32(i as f32 / fps as f32)))
            .collect();
        frames.push(VisualState::SETTLED);
        frames
    }
}

/// An entrance bound to a motion decision
///
/// Under reduced motion the entrance collapses: the initial state is the
/// final state and there are no intermediate frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptedEntrance {
    entrance: Entrance,
    reduced: bool,
}

impl AdaptedEntrance {
    /// Whether the entrance was collapsed
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// State on first render
    #[must_use]
    pub fn initial_state(&self) -> VisualState {
        if self.reduced {
            VisualState::SETTLED
        } else {
            self.entrance.from
        }
    }

    /// State `elapsed` after first render
    #[must_use]
    pub fn state_at(&self, elapsed: Duration) -> VisualState {
        if self.reduced {
            VisualState::SETTLED
        } else {
            self.entrance.state_at(elapsed)
        }
    }

    /// Frames to render at `fps`
    #[must_use]
    pub fn frames(&self, fps: u32) -> Vec<VisualState> {
        if self.reduced {
            vec![VisualState::SETTLED]
        } else {
            self.entrance.frames(fps)
        }
    }

    /// How long the surface should keep animating
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        if self.reduced {
            Duration::ZERO
        } else {
            self.entrance.total_duration()
        }
    }
}
