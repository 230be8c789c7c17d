//! Desktop controller: four windows open and reveal their content on
//! independent delays, geometry swaps wholesale between a landscape and a
//! portrait layout, and the image viewer cycles a slideshow.

use std::time::Duration;

use ratatui::layout::Rect;

use crate::timeline::{Timeline, TimerHandle};

// ── Orientation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Decides portrait vs landscape from viewport dimensions.
///
/// Terminal cells are roughly twice as tall as wide, so the column count is
/// scaled by `cell_aspect` before the ratio test (ratio < 1 ⇒ portrait).
/// Injected into the controller so layout logic is testable without a
/// terminal.
#[derive(Debug, Clone, Copy)]
pub struct OrientationClassifier {
    cell_aspect: f32,
}

impl Default for OrientationClassifier {
    fn default() -> Self {
        Self { cell_aspect: 0.5 }
    }
}

impl OrientationClassifier {
    #[allow(dead_code)]
    pub fn new(cell_aspect: f32) -> Self {
        Self { cell_aspect }
    }

    pub fn classify(&self, width: u16, height: u16) -> Orientation {
        if height == 0 {
            return Orientation::Landscape;
        }
        let ratio = (width as f32 * self.cell_aspect) / height as f32;
        if ratio < 1.0 {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

// ── Window specs ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowId {
    Profile,
    Viewer,
    Browser,
    Links,
}

/// Window geometry in layout-relative units (fractions of the viewport).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl WinRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Map to terminal cells within `area`.
    pub fn to_cells(&self, area: Rect) -> Rect {
        let x = area.x + (self.x * area.width as f32) as u16;
        let y = area.y + (self.y * area.height as f32) as u16;
        let w = ((self.w * area.width as f32) as u16).max(1);
        let h = ((self.h * area.height as f32) as u16).max(1);
        Rect {
            x: x.min(area.right().saturating_sub(1)),
            y: y.min(area.bottom().saturating_sub(1)),
            width: w.min(area.width),
            height: h.min(area.height),
        }
    }
}

/// Static description of one desktop panel: geometry per layout plus its
/// two reveal delays, both relative to desktop activation.
#[derive(Debug, Clone)]
pub struct WindowSpec {
    pub id: WindowId,
    pub title: String,
    pub landscape: WinRect,
    pub portrait: WinRect,
    pub open_delay: Duration,
    pub reveal_delay: Duration,
}

impl WindowSpec {
    pub fn rect(&self, orientation: Orientation) -> WinRect {
        match orientation {
            Orientation::Landscape => self.landscape,
            Orientation::Portrait => self.portrait,
        }
    }
}

/// The four windows of the portfolio desktop, with the staggered reveal
/// the page uses: profile first, then the viewer, browser, and links.
pub fn default_window_specs() -> Vec<WindowSpec> {
    let ms = Duration::from_millis;
    vec![
        WindowSpec {
            id: WindowId::Profile,
            title: "about me".into(),
            landscape: WinRect::new(0.03, 0.08, 0.44, 0.55),
            portrait: WinRect::new(0.05, 0.03, 0.90, 0.30),
            open_delay: ms(300),
            reveal_delay: ms(1000),
        },
        WindowSpec {
            id: WindowId::Viewer,
            title: "viewer".into(),
            landscape: WinRect::new(0.52, 0.06, 0.44, 0.60),
            portrait: WinRect::new(0.05, 0.34, 0.90, 0.30),
            open_delay: ms(800),
            reveal_delay: ms(500),
        },
        WindowSpec {
            id: WindowId::Browser,
            title: "browser".into(),
            landscape: WinRect::new(0.03, 0.66, 0.56, 0.28),
            portrait: WinRect::new(0.05, 0.65, 0.90, 0.18),
            open_delay: ms(1300),
            reveal_delay: ms(400),
        },
        WindowSpec {
            id: WindowId::Links,
            title: "links".into(),
            landscape: WinRect::new(0.62, 0.70, 0.34, 0.24),
            portrait: WinRect::new(0.05, 0.84, 0.90, 0.13),
            open_delay: ms(1700),
            reveal_delay: ms(300),
        },
    ]
}

// ── Controller ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowState {
    pub open: bool,
    pub content: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DesktopMsg {
    Open(WindowId),
    Reveal(WindowId),
    Slide,
}

pub struct DesktopController {
    specs: Vec<WindowSpec>,
    states: Vec<WindowState>,
    orientation: Orientation,
    classifier: OrientationClassifier,
    image_count: usize,
    slide_index: usize,
    slide_every: Duration,
    timers: Timeline<DesktopMsg>,
    slide_timer: Option<TimerHandle>,
}

impl DesktopController {
    pub fn new(
        specs: Vec<WindowSpec>,
        classifier: OrientationClassifier,
        image_count: usize,
        slide_every: Duration,
    ) -> Self {
        let states = vec![WindowState::default(); specs.len()];
        Self {
            specs,
            states,
            orientation: Orientation::Landscape,
            classifier,
            image_count,
            slide_index: 0,
            slide_every,
            timers: Timeline::new(),
            slide_timer: None,
        }
    }

    pub fn activate(&mut self) {
        self.timers.clear();
        self.slide_timer = None;
        for s in self.states.iter_mut() {
            *s = WindowState::default();
        }
        self.slide_index = 0;
        for spec in &self.specs {
            // Open registers before reveal, so even a zero reveal delay
            // keeps the per-window open-then-reveal order.
            self.timers.schedule(spec.open_delay, DesktopMsg::Open(spec.id));
            self.timers
                .schedule(spec.open_delay + spec.reveal_delay, DesktopMsg::Reveal(spec.id));
        }
        if self.image_count > 1 {
            self.slide_timer = Some(self.timers.repeat(self.slide_every, DesktopMsg::Slide));
        }
    }

    pub fn dispose(&mut self) {
        if let Some(h) = self.slide_timer.take() {
            self.timers.cancel(h);
        }
        self.timers.clear();
    }

    /// Drive to `now` (time since activation). The desktop is the terminal
    /// phase; there is no completion signal.
    pub fn tick(&mut self, now: Duration) {
        while let Some(msg) = self.timers.pop_due(now) {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: DesktopMsg) {
        match msg {
            DesktopMsg::Open(id) => {
                if let Some(s) = self.state_mut(id) {
                    s.open = true;
                }
            }
            DesktopMsg::Reveal(id) => {
                if let Some(s) = self.state_mut(id) {
                    s.content = true;
                }
            }
            DesktopMsg::Slide => {
                if self.image_count > 0 {
                    self.slide_index = (self.slide_index + 1) % self.image_count;
                }
            }
        }
    }

    fn state_mut(&mut self, id: WindowId) -> Option<&mut WindowState> {
        let idx = self.specs.iter().position(|s| s.id == id)?;
        self.states.get_mut(idx)
    }

    /// Reclassify orientation from new viewport dimensions. Geometry swaps
    /// wholesale; open/content flags are untouched.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.orientation = self.classifier.classify(width, height);
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    pub fn windows(&self) -> impl Iterator<Item = (&WindowSpec, WindowState)> {
        self.specs.iter().zip(self.states.iter().copied())
    }

    #[allow(dead_code)]
    pub fn window_state(&self, id: WindowId) -> WindowState {
        self.specs
            .iter()
            .position(|s| s.id == id)
            .and_then(|i| self.states.get(i).copied())
            .unwrap_or_default()
    }

    #[allow(dead_code)]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller() -> DesktopController {
        let mut c = DesktopController::new(
            default_window_specs(),
            OrientationClassifier::new(1.0),
            3,
            ms(4_000),
        );
        c.activate();
        c
    }

    #[test]
    fn each_window_opens_before_its_content_reveals() {
        let mut c = controller();
        for t in (0..4_000).step_by(100) {
            c.tick(ms(t));
            for (_, state) in c.windows() {
                assert!(!state.content || state.open);
            }
        }
        // Eventually everything is open and revealed.
        for (_, state) in c.windows() {
            assert!(state.open && state.content);
        }
    }

    #[test]
    fn open_and_reveal_follow_the_per_window_delays() {
        let mut c = controller();
        c.tick(ms(299));
        assert!(!c.window_state(WindowId::Profile).open);
        c.tick(ms(300));
        assert!(c.window_state(WindowId::Profile).open);
        assert!(!c.window_state(WindowId::Profile).content);
        c.tick(ms(1_300));
        assert!(c.window_state(WindowId::Profile).content);
        assert!(c.window_state(WindowId::Viewer).open);
        assert!(!c.window_state(WindowId::Links).open);
    }

    #[test]
    fn zero_reveal_delay_still_orders_open_first() {
        let spec = WindowSpec {
            id: WindowId::Browser,
            title: "browser".into(),
            landscape: WinRect::new(0.0, 0.0, 0.5, 0.5),
            portrait: WinRect::new(0.0, 0.0, 1.0, 0.5),
            open_delay: ms(100),
            reveal_delay: Duration::ZERO,
        };
        let mut c =
            DesktopController::new(vec![spec], OrientationClassifier::new(1.0), 0, ms(4_000));
        c.activate();
        c.tick(ms(100));
        let s = c.window_state(WindowId::Browser);
        assert!(s.open && s.content);
    }

    #[test]
    fn orientation_swap_changes_geometry_but_not_flags() {
        let mut c = controller();
        c.tick(ms(1_000));
        let before: Vec<WindowState> = c.windows().map(|(_, s)| s).collect();
        assert_eq!(c.orientation(), Orientation::Landscape);

        c.resize(50, 100);
        assert_eq!(c.orientation(), Orientation::Portrait);
        let after: Vec<WindowState> = c.windows().map(|(_, s)| s).collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.open, a.open);
            assert_eq!(b.content, a.content);
        }
        for (spec, _) in c.windows() {
            assert_ne!(spec.rect(Orientation::Portrait), spec.rect(Orientation::Landscape));
        }

        c.resize(100, 50);
        assert_eq!(c.orientation(), Orientation::Landscape);
    }

    #[test]
    fn slideshow_wraps_modulo_the_image_count() {
        let mut c = controller();
        assert_eq!(c.slide_index(), 0);
        c.tick(ms(4_000));
        assert_eq!(c.slide_index(), 1);
        c.tick(ms(8_000));
        assert_eq!(c.slide_index(), 2);
        c.tick(ms(12_000));
        assert_eq!(c.slide_index(), 0);
    }

    #[test]
    fn single_image_never_arms_the_slideshow() {
        let mut c = DesktopController::new(
            default_window_specs(),
            OrientationClassifier::default(),
            1,
            ms(4_000),
        );
        c.activate();
        c.tick(ms(60_000));
        assert_eq!(c.slide_index(), 0);
        // Only the 8 open/reveal one-shots ever existed, all fired by now.
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn dispose_cancels_open_reveal_and_slideshow_timers() {
        let mut c = controller();
        c.tick(ms(500));
        assert!(c.pending_timers() > 0);
        c.dispose();
        assert_eq!(c.pending_timers(), 0);
        let before = c.window_state(WindowId::Links);
        c.tick(ms(60_000));
        assert_eq!(c.window_state(WindowId::Links).open, before.open);
        assert_eq!(c.slide_index(), 0);
    }

    #[test]
    fn classifier_follows_the_width_over_height_ratio() {
        let square = OrientationClassifier::new(1.0);
        assert_eq!(square.classify(80, 100), Orientation::Portrait);
        assert_eq!(square.classify(100, 80), Orientation::Landscape);
        assert_eq!(square.classify(100, 100), Orientation::Landscape);

        // Terminal default: 80x24 cells is landscape, 40x60 is portrait.
        let cells = OrientationClassifier::default();
        assert_eq!(cells.classify(80, 24), Orientation::Landscape);
        assert_eq!(cells.classify(40, 60), Orientation::Portrait);
    }
}
