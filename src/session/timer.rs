//! Host-driven question countdown.
//!
//! The engine has no clock of its own. The host sends one tick per
//! second tagged with the question index it believes is live, and the
//! timer discards ticks that arrive late for an earlier question or
//! after a cancel. Reaching zero disarms the timer but judges nothing.
//! An answer picked after expiry still resolves, it just lands in the
//! slowest reward band.

/// Countdown armed for at most one question at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuestionTimer {
    active: Option<Armed>,
}

#[derive(Clone, Copy, Debug)]
struct Armed {
    question_index: u32,
    remaining: u32,
}

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick accepted. Seconds still on the clock.
    Counted { remaining: u32 },
    /// Tick accepted and the clock hit zero. The timer disarms.
    Expired,
    /// Tick was stale or the timer was not armed. Nothing changed.
    Ignored,
}

impl QuestionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the countdown for a question. Replaces any prior arming.
    pub fn arm(&mut self, question_index: u32, seconds: u32) {
        self.active = Some(Armed {
            question_index,
            remaining: seconds,
        });
    }

    /// Disarm without expiring. Used when an answer lands in time.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Whether the timer is currently armed for this question.
    #[must_use]
    pub fn is_armed_for(&self, question_index: u32) -> bool {
        matches!(self.active, Some(armed) if armed.question_index == question_index)
    }

    /// Seconds remaining, if armed.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.active.map(|armed| armed.remaining)
    }

    /// Count one second off the clock for the given question.
    pub fn tick(&mut self, question_index: u32) -> TickOutcome {
        let Some(armed) = self.active.as_mut() else {
            return TickOutcome::Ignored;
        };
        if armed.question_index != question_index {
            return TickOutcome::Ignored;
        }

        armed.remaining = armed.remaining.saturating_sub(1);
        if armed.remaining == 0 {
            self.active = None;
            TickOutcome::Expired
        } else {
            TickOutcome::Counted {
                remaining: armed.remaining,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_expiry() {
        let mut timer = QuestionTimer::new();
        timer.arm(1, 3);

        assert_eq!(timer.tick(1), TickOutcome::Counted { remaining: 2 });
        assert_eq!(timer.tick(1), TickOutcome::Counted { remaining: 1 });
        assert_eq!(timer.tick(1), TickOutcome::Expired);
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_expiry_fires_once() {
        let mut timer = QuestionTimer::new();
        timer.arm(1, 1);

        assert_eq!(timer.tick(1), TickOutcome::Expired);
        assert_eq!(timer.tick(1), TickOutcome::Ignored);
        assert_eq!(timer.tick(1), TickOutcome::Ignored);
    }

    #[test]
    fn test_stale_question_index_ignored() {
        let mut timer = QuestionTimer::new();
        timer.arm(2, 10);

        assert_eq!(timer.tick(1), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), Some(10));
        assert_eq!(timer.tick(2), TickOutcome::Counted { remaining: 9 });
    }

    #[test]
    fn test_cancel_disarms() {
        let mut timer = QuestionTimer::new();
        timer.arm(3, 10);
        timer.cancel();

        assert!(!timer.is_armed_for(3));
        assert_eq!(timer.tick(3), TickOutcome::Ignored);
    }

    #[test]
    fn test_rearm_replaces() {
        let mut timer = QuestionTimer::new();
        timer.arm(1, 10);
        timer.arm(2, 30);

        assert!(!timer.is_armed_for(1));
        assert!(timer.is_armed_for(2));
        assert_eq!(timer.tick(2), TickOutcome::Counted { remaining: 29 });
    }

    #[test]
    fn test_unarmed_ticks_ignored() {
        let mut timer = QuestionTimer::new();
        assert_eq!(timer.tick(1), TickOutcome::Ignored);
    }
}
