//! Verzögerte Freigabe einer geparkten Karte (One-Shot-Timer mit Abbruch-Token).

use super::physics::{BodyHandle, BodyKind, PhysicsWorld};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lebendigkeits-Flag, das der Besitzer beim Abbau setzt.
///
/// Klone teilen sich dasselbe Flag, sodass ein bereits herausgegebener
/// Callback einen späteren Abbruch bemerkt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Zustand des Timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Armed,
    Fired,
    Cancelled,
}

/// One-Shot-Timer, der nach `delay` die Karte wieder der Simulation übergibt.
#[derive(Debug, Clone)]
pub struct PendingRelease {
    delay: Duration,
    elapsed: Duration,
    body: BodyHandle,
    token: CancelToken,
    state: ReleaseState,
}

impl PendingRelease {
    /// Schärft einen Timer für `body`.
    pub fn arm(delay: Duration, body: BodyHandle) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            body,
            token: CancelToken::new(),
            state: ReleaseState::Armed,
        }
    }

    pub fn state(&self) -> ReleaseState {
        self.state
    }

    /// Token für externe Beobachter (z.B. einen Host-Scheduler).
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Zählt Frame-Zeit hoch. Liefert genau einmal den Callback, sobald `delay` erreicht ist.
    pub fn advance(&mut self, dt: f32) -> Option<ReleaseCallback> {
        if self.state != ReleaseState::Armed {
            return None;
        }
        if self.token.is_cancelled() {
            self.state = ReleaseState::Cancelled;
            return None;
        }
        self.elapsed += Duration::try_from_secs_f32(dt.max(0.0)).unwrap_or(Duration::ZERO);
        if self.elapsed < self.delay {
            return None;
        }
        self.state = ReleaseState::Fired;
        Some(ReleaseCallback {
            body: self.body,
            token: self.token.clone(),
        })
    }

    /// Bricht den Timer ab. Auch bereits herausgegebene Callbacks werden wirkungslos.
    pub fn cancel(&mut self) {
        self.token.cancel();
        if self.state == ReleaseState::Armed {
            self.state = ReleaseState::Cancelled;
        }
    }
}

/// Fälliger Freigabe-Callback: weckt die Karte und schaltet sie dynamisch.
#[derive(Debug, Clone)]
pub struct ReleaseCallback {
    body: BodyHandle,
    token: CancelToken,
}

impl ReleaseCallback {
    /// Führt die Freigabe aus. `false`, wenn der Besitzer inzwischen abgebaut wurde.
    pub fn invoke<W: PhysicsWorld>(&self, world: &mut W) -> bool {
        if self.token.is_cancelled() {
            log::debug!("Veralteter Freigabe-Callback ignoriert (Body {:?})", self.body);
            return false;
        }
        world.set_body_kind(self.body, BodyKind::Dynamic);
        world.wake_up(self.body);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::BodyDesc;
    use crate::core::solver::{RopeWorld, SolverConfig};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_infinite_dt_does_not_panic_or_fire() {
        let mut release = PendingRelease::arm(Duration::from_millis(10), BodyHandle(0));

        assert!(release.advance(f32::INFINITY).is_none());
        assert!(release.advance(f32::NAN).is_none());
        assert_eq!(release.state(), ReleaseState::Armed);
        assert!(release.advance(0.02).is_some());
    }

    #[test]
    fn test_fires_exactly_once_after_delay() {
        let mut release = PendingRelease::arm(Duration::from_millis(500), BodyHandle(0));
        let mut fired_at = Vec::new();
        for frame in 0..120 {
            if release.advance(DT).is_some() {
                fired_at.push(frame);
            }
        }
        assert_eq!(fired_at.len(), 1);
        // 500ms = 30 Frames à 16.7ms, also frühestens Frame-Index 29
        assert!(fired_at[0] >= 29, "zu früh gefeuert: {}", fired_at[0]);
        assert!(fired_at[0] <= 30);
        assert_eq!(release.state(), ReleaseState::Fired);
    }

    #[test]
    fn test_cancel_before_expiry_never_fires() {
        let mut release = PendingRelease::arm(Duration::from_millis(100), BodyHandle(0));
        release.advance(DT);
        release.cancel();
        for _ in 0..60 {
            assert!(release.advance(DT).is_none());
        }
        assert_eq!(release.state(), ReleaseState::Cancelled);
    }

    #[test]
    fn test_external_token_cancel_is_observed() {
        let mut release = PendingRelease::arm(Duration::from_millis(100), BodyHandle(0));
        release.token().cancel();
        assert!(release.advance(1.0).is_none());
        assert_eq!(release.state(), ReleaseState::Cancelled);
    }

    #[test]
    fn test_stale_callback_is_ignored() {
        let mut world = RopeWorld::new(SolverConfig::default());
        let mut desc = BodyDesc::dynamic(Vec3::ZERO);
        desc.kind = BodyKind::Kinematic;
        let body = world.create_body(&desc);

        let mut release = PendingRelease::arm(Duration::ZERO, body);
        let callback = release.advance(DT).expect("Callback erwartet");
        // Besitzer wird abgebaut, bevor der Callback läuft
        release.cancel();

        assert!(!callback.invoke(&mut world));
        assert_eq!(world.body_kind(body), Some(BodyKind::Kinematic));
    }

    #[test]
    fn test_live_callback_releases_body() {
        let mut world = RopeWorld::new(SolverConfig::default());
        let mut desc = BodyDesc::dynamic(Vec3::ZERO);
        desc.kind = BodyKind::Kinematic;
        let body = world.create_body(&desc);
        world.sleep(body);

        let mut release = PendingRelease::arm(Duration::from_millis(15), body);
        assert!(release.advance(0.01).is_none());
        let callback = release.advance(0.01).expect("Callback erwartet");

        assert!(callback.invoke(&mut world));
        assert_eq!(world.body_kind(body), Some(BodyKind::Dynamic));
        assert_eq!(world.is_sleeping(body), Some(false));
    }
}
