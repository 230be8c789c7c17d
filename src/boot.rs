//! Boot screen controller: reveals the boot log line by line, then signals
//! completion after a short trailing pause.

use std::time::Duration;

use crate::timeline::{Timeline, TimerHandle};

pub const LINE_INTERVAL: Duration = Duration::from_millis(150);
pub const TRAILING_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootMsg {
    Line,
    Finished,
}

pub struct BootController {
    lines: Vec<String>,
    interval: Duration,
    trailing: Duration,
    revealed: usize,
    finished: bool,
    timers: Timeline<BootMsg>,
    line_timer: Option<TimerHandle>,
}

impl BootController {
    pub fn new(lines: Vec<String>) -> Self {
        Self::with_timing(lines, LINE_INTERVAL, TRAILING_DELAY)
    }

    pub fn with_timing(lines: Vec<String>, interval: Duration, trailing: Duration) -> Self {
        Self {
            lines,
            interval,
            trailing,
            revealed: 0,
            finished: false,
            timers: Timeline::new(),
            line_timer: None,
        }
    }

    /// Start (or restart) the sequence from the first line.
    pub fn activate(&mut self) {
        self.timers.clear();
        self.revealed = 0;
        self.finished = false;
        if self.lines.is_empty() {
            self.line_timer = None;
            self.timers.schedule(self.trailing, BootMsg::Finished);
        } else {
            self.line_timer = Some(self.timers.repeat(self.interval, BootMsg::Line));
        }
    }

    /// Cancel every pending timer. Nothing fires after this.
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.line_timer = None;
    }

    /// Drive the sequence to `now` (time since activation). Returns `true`
    /// on the tick where the completion signal fires; it fires exactly once.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut completed = false;
        while let Some(msg) = self.timers.pop_due(now) {
            completed |= self.apply(msg);
        }
        completed
    }

    fn apply(&mut self, msg: BootMsg) -> bool {
        match msg {
            BootMsg::Line => {
                if self.revealed < self.lines.len() {
                    self.revealed += 1;
                    if self.revealed == self.lines.len() {
                        if let Some(h) = self.line_timer.take() {
                            self.timers.cancel(h);
                        }
                        self.timers.schedule(self.trailing, BootMsg::Finished);
                    }
                }
                false
            }
            BootMsg::Finished => {
                if self.finished {
                    false
                } else {
                    self.finished = true;
                    true
                }
            }
        }
    }

    /// Reveal everything and fast-forward to completion (Space/Enter/Esc).
    pub fn skip(&mut self) {
        if self.finished {
            return;
        }
        self.revealed = self.lines.len();
        self.timers.clear();
        self.line_timer = None;
        self.timers.schedule(Duration::ZERO, BootMsg::Finished);
    }

    pub fn visible_lines(&self) -> &[String] {
        &self.lines[..self.revealed]
    }

    pub fn is_finished(&self) -> bool {
        self.finished
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

    fn abc() -> BootController {
        let mut c = BootController::new(vec!["a".into(), "b".into(), "c".into()]);
        c.activate();
        c
    }

    #[test]
    fn reveals_lines_on_the_documented_cadence() {
        let mut c = abc();
        assert!(c.visible_lines().is_empty());
        c.tick(ms(149));
        assert!(c.visible_lines().is_empty());
        c.tick(ms(150));
        assert_eq!(c.visible_lines(), ["a"]);
        c.tick(ms(300));
        assert_eq!(c.visible_lines(), ["a", "b"]);
        c.tick(ms(450));
        assert_eq!(c.visible_lines(), ["a", "b", "c"]);
        assert!(!c.is_finished());
    }

    #[test]
    fn completion_fires_once_after_the_trailing_delay() {
        let mut c = abc();
        assert!(!c.tick(ms(949)));
        assert!(c.tick(ms(950)));
        assert!(c.is_finished());
        // Never again, no matter how far time advances.
        assert!(!c.tick(ms(60_000)));
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn never_reveals_more_than_n_lines() {
        let mut c = abc();
        c.tick(ms(60_000));
        assert_eq!(c.visible_lines().len(), 3);
    }

    #[test]
    fn empty_log_still_completes_exactly_once() {
        let mut c = BootController::new(Vec::new());
        c.activate();
        assert!(!c.tick(ms(499)));
        assert!(c.tick(ms(500)));
        assert!(!c.tick(ms(1_000)));
    }

    #[test]
    fn dispose_cancels_all_pending_timers() {
        let mut c = abc();
        c.tick(ms(150));
        assert!(c.pending_timers() > 0);
        c.dispose();
        assert_eq!(c.pending_timers(), 0);
        assert!(!c.tick(ms(60_000)));
        assert_eq!(c.visible_lines(), ["a"]);
    }

    #[test]
    fn skip_reveals_everything_and_completes_promptly() {
        let mut c = abc();
        c.tick(ms(150));
        c.skip();
        assert_eq!(c.visible_lines().len(), 3);
        assert!(c.tick(ms(151)));
        assert!(!c.tick(ms(10_000)));
    }

    #[test]
    fn reactivation_restarts_from_scratch() {
        let mut c = abc();
        c.tick(ms(950));
        assert!(c.is_finished());
        c.activate();
        assert!(c.visible_lines().is_empty());
        assert!(!c.is_finished());
        assert!(c.tick(ms(950 + 950)));
    }
}
