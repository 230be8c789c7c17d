//! Login screen controller: a scripted display-manager mimicry. The
//! username appears, then the masked password "types itself", then the
//! screen signals completion. Purely time-driven; there is no real
//! credential check behind it.

use std::time::Duration;

use crate::timeline::{Timeline, TimerHandle};

pub const USERNAME_DELAY: Duration = Duration::from_millis(800);
pub const TYPING_DELAY: Duration = Duration::from_millis(1800);
pub const COMPLETE_DELAY: Duration = Duration::from_millis(2500);
pub const CHAR_INTERVAL: Duration = Duration::from_millis(50);

/// Stages advance monotonically; `Ord` mirrors that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginStage {
    Idle,
    UsernameShown,
    PasswordTyping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginMsg {
    ShowUsername,
    StartTyping,
    TypeChar,
    Finished,
}

pub struct LoginController {
    username: String,
    password_mask: String,
    mask_len: usize,
    stage: LoginStage,
    typed: usize,
    finished: bool,
    timers: Timeline<LoginMsg>,
    type_timer: Option<TimerHandle>,
}

impl LoginController {
    pub fn new(username: String, password_mask: String) -> Self {
        let mask_len = password_mask.chars().count();
        Self {
            username,
            password_mask,
            mask_len,
            stage: LoginStage::Idle,
            typed: 0,
            finished: false,
            timers: Timeline::new(),
            type_timer: None,
        }
    }

    pub fn activate(&mut self) {
        self.timers.clear();
        self.type_timer = None;
        self.stage = LoginStage::Idle;
        self.typed = 0;
        self.finished = false;
        self.timers.schedule(USERNAME_DELAY, LoginMsg::ShowUsername);
        self.timers.schedule(TYPING_DELAY, LoginMsg::StartTyping);
        self.timers.schedule(COMPLETE_DELAY, LoginMsg::Finished);
    }

    pub fn dispose(&mut self) {
        self.timers.clear();
        self.type_timer = None;
    }

    /// Drive to `now` (time since activation). `true` on the tick where the
    /// completion signal fires; exactly once.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut completed = false;
        while let Some(msg) = self.timers.pop_due(now) {
            completed |= self.apply(msg);
        }
        completed
    }

    fn apply(&mut self, msg: LoginMsg) -> bool {
        match msg {
            LoginMsg::ShowUsername => {
                if self.stage == LoginStage::Idle {
                    self.stage = LoginStage::UsernameShown;
                }
                false
            }
            LoginMsg::StartTyping => {
                if self.stage < LoginStage::PasswordTyping {
                    self.stage = LoginStage::PasswordTyping;
                    if self.typed < self.mask_len {
                        self.type_timer = Some(self.timers.repeat(CHAR_INTERVAL, LoginMsg::TypeChar));
                    }
                }
                false
            }
            LoginMsg::TypeChar => {
                if self.typed < self.mask_len {
                    self.typed += 1;
                    if self.typed == self.mask_len {
                        if let Some(h) = self.type_timer.take() {
                            self.timers.cancel(h);
                        }
                    }
                }
                false
            }
            LoginMsg::Finished => {
                if self.finished {
                    false
                } else {
                    self.finished = true;
                    true
                }
            }
        }
    }

    pub fn stage(&self) -> LoginStage {
        self.stage
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The part of the mask "typed" so far.
    pub fn password_prefix(&self) -> String {
        self.password_mask.chars().take(self.typed).collect()
    }

    #[allow(dead_code)]
    pub fn typed_len(&self) -> usize {
        self.typed
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
