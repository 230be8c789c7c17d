//! Top-level phase state machine: Boot → Login → Desktop, one-way.
//!
//! The session owns all three controllers and the app clock. Controllers
//! run on local time (zero at their own activation); the session keeps the
//! active phase's epoch and translates. A phase transition disposes the
//! outgoing controller, cancelling every timer it owns, before the
//! incoming one is activated.

use std::time::Duration;

use crate::boot::BootController;
use crate::desktop::DesktopController;
use crate::login::LoginController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Boot,
    Login,
    Desktop,
}

pub struct Session {
    phase: Phase,
    phase_started: Duration,
    started: bool,
    boot: BootController,
    login: LoginController,
    desktop: DesktopController,
}

impl Session {
    pub fn new(boot: BootController, login: LoginController, desktop: DesktopController) -> Self {
        Self {
            phase: Phase::Boot,
            phase_started: Duration::ZERO,
            started: false,
            boot,
            login,
            desktop,
        }
    }

    /// Activate the first phase. With `skip_boot` the boot animation is
    /// bypassed entirely and the session opens on the login screen.
    pub fn start(&mut self, skip_boot: bool) {
        if self.started {
            return;
        }
        self.started = true;
        if skip_boot {
            self.phase = Phase::Login;
            self.login.activate();
        } else {
            self.boot.activate();
        }
    }

    /// Drive the active controller to `now` (app time since `start`),
    /// advancing the phase on a completion signal.
    pub fn tick(&mut self, now: Duration) {
        if !self.started {
            return;
        }
        let local = now.saturating_sub(self.phase_started);
        match self.phase {
            Phase::Boot => {
                if self.boot.tick(local) {
                    self.boot.dispose();
                    self.phase = Phase::Login;
                    self.phase_started = now;
                    self.login.activate();
                }
            }
            Phase::Login => {
                if self.login.tick(local) {
                    self.login.dispose();
                    self.phase = Phase::Desktop;
                    self.phase_started = now;
                    self.desktop.activate();
                }
            }
            Phase::Desktop => self.desktop.tick(local),
        }
    }

    /// Skip the boot animation (no-op outside the boot phase).
    pub fn skip_boot(&mut self) {
        if self.phase == Phase::Boot {
            self.boot.skip();
        }
    }

    /// Viewport change; only the desktop's orientation classifier observes
    /// resizes, whichever phase is active.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.desktop.resize(width, height);
    }

    /// Earliest pending deadline across the active controller, in app
    /// time. Lets the event loop sleep until something is actually due.
    pub fn next_timer(&self) -> Option<Duration> {
        let local = match self.phase {
            Phase::Boot => self.boot.next_due(),
            Phase::Login => self.login.next_due(),
            Phase::Desktop => self.desktop.next_due(),
        };
        local.map(|d| d + self.phase_started)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn boot(&self) -> &BootController {
        &self.boot
    }

    pub fn login(&self) -> &LoginController {
        &self.login
    }

    pub fn desktop(&self) -> &DesktopController {
        &self.desktop
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::{default_window_specs, OrientationClassifier, WindowId};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session() -> Session {
        let boot = BootController::new(vec!["a".into(), "b".into(), "c".into()]);
        let login = LoginController::new("guest".into(), "********".into());
        let desktop = DesktopController::new(
            default_window_specs(),
            OrientationClassifier::new(1.0),
            3,
            ms(4_000),
        );
        let mut s = Session::new(boot, login, desktop);
        s.start(false);
        s
    }

    #[test]
    fn starts_in_boot() {
        let s = session();
        assert_eq!(s.phase(), Phase::Boot);
    }

    #[test]
    fn boot_completion_enters_login_with_boot_timers_cancelled() {
        let mut s = session();
        s.tick(ms(949));
        assert_eq!(s.phase(), Phase::Boot);
        s.tick(ms(950));
        assert_eq!(s.phase(), Phase::Login);
        assert_eq!(s.boot().pending_timers(), 0);
        assert!(s.login().pending_timers() > 0);
    }

    #[test]
    fn login_runs_on_its_own_clock_after_the_transition() {
        let mut s = session();
        s.tick(ms(950));
        // 800ms into the login phase = 1750ms of app time.
        s.tick(ms(1_749));
        assert_eq!(s.login().stage(), crate::login::LoginStage::Idle);
        s.tick(ms(1_750));
        assert_eq!(s.login().stage(), crate::login::LoginStage::UsernameShown);
    }

    #[test]
    fn login_completion_enters_desktop_with_login_timers_cancelled() {
        let mut s = session();
        s.tick(ms(950));
        s.tick(ms(950 + 2_500));
        assert_eq!(s.phase(), Phase::Desktop);
        assert_eq!(s.login().pending_timers(), 0);
        assert!(s.desktop().pending_timers() > 0);
    }

    #[test]
    fn desktop_is_terminal_and_keeps_animating() {
        let mut s = session();
        s.tick(ms(950));
        s.tick(ms(3_450));
        assert_eq!(s.phase(), Phase::Desktop);
        // 2s into the desktop phase the first two windows are open.
        s.tick(ms(3_450 + 2_000));
        assert_eq!(s.phase(), Phase::Desktop);
        assert!(s.desktop().window_state(WindowId::Profile).open);
        assert!(s.desktop().window_state(WindowId::Links).content);
        // Slideshow advanced once by 4s of desktop time.
        s.tick(ms(3_450 + 4_000));
        assert_eq!(s.desktop().slide_index(), 1);
        s.tick(ms(120_000));
        assert_eq!(s.phase(), Phase::Desktop);
    }

    #[test]
    fn coarse_ticks_cross_one_phase_at_a_time() {
        let mut s = session();
        // The whole boot sequence inside one tick; login starts fresh at
        // the transition instant and runs on its own clock from there.
        s.tick(ms(60_000));
        assert_eq!(s.phase(), Phase::Login);
        assert_eq!(s.boot().pending_timers(), 0);
        s.tick(ms(60_000 + 2_500));
        assert_eq!(s.phase(), Phase::Desktop);
        assert_eq!(s.login().pending_timers(), 0);
    }

    #[test]
    fn skip_boot_flag_opens_on_login() {
        let boot = BootController::new(vec!["a".into()]);
        let login = LoginController::new("guest".into(), "****".into());
        let desktop = DesktopController::new(
            default_window_specs(),
            OrientationClassifier::default(),
            0,
            ms(4_000),
        );
        let mut s = Session::new(boot, login, desktop);
        s.start(true);
        assert_eq!(s.phase(), Phase::Login);
        assert_eq!(s.boot().pending_timers(), 0);
    }

    #[test]
    fn skip_key_fast_forwards_boot() {
        let mut s = session();
        s.tick(ms(150));
        s.skip_boot();
        s.tick(ms(200));
        assert_eq!(s.phase(), Phase::Login);
        assert_eq!(s.boot().visible_lines().len(), 3);
    }

    #[test]
    fn resize_reaches_the_desktop_classifier_in_any_phase() {
        let mut s = session();
        s.resize(50, 100);
        s.tick(ms(60_000));
        assert_eq!(
            s.desktop().orientation(),
            crate::desktop::Orientation::Portrait
        );
    }

    #[test]
    fn next_timer_tracks_the_active_phase_epoch() {
        let mut s = session();
        assert_eq!(s.next_timer(), Some(ms(150)));
        s.tick(ms(950));
        // First login deadline is 800ms after the transition at 950.
        assert_eq!(s.next_timer(), Some(ms(950 + 800)));
    }
}
