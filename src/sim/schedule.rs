//! Ring-local clock for the repeating pulse and deferred block clears
//!
//! Events come out in time order, so a long frame that spans a pulse and
//! its clear still applies them raise-then-clear.

use std::collections::VecDeque;

/// Pulses a single long frame may replay; older missed pulses are dropped
const MAX_CATCHUP_PULSES: f64 = 8.0;

/// Shortest interval the clock accepts
const MIN_INTERVAL: f64 = 1e-3;

/// A queued "stop raising this block" task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingClear {
    /// Clock time the clear is due (seconds)
    pub fire_time: f64,
    /// Block the clear targets
    pub block_id: u32,
    /// Ring generation at the time the clear was queued
    pub generation: u32,
}

/// An event whose time has come
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Due {
    /// The repeating "raise all" pulse fired at `at`
    Pulse { at: f64 },
    /// A deferred clear is due
    Clear(PendingClear),
}

#[derive(Debug, Clone)]
pub struct Schedule {
    now: f64,
    pulse_interval: f64,
    next_pulse: f64,
    pending: VecDeque<PendingClear>,
}

impl Schedule {
    /// Start a clock whose first pulse fires one interval from now
    pub fn new(pulse_interval: f32) -> Self {
        let pulse_interval = (pulse_interval as f64).max(MIN_INTERVAL);
        Self {
            now: 0.0,
            pulse_interval,
            next_pulse: pulse_interval,
            pending: VecDeque::new(),
        }
    }

    /// Current clock time (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward. Events that became due are returned by `pop_due`.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt as f64;
        }
        let backlog = self.pulse_interval * MAX_CATCHUP_PULSES;
        if self.now - self.next_pulse > backlog {
            let skipped = ((self.now - self.next_pulse - backlog) / self.pulse_interval).ceil();
            self.next_pulse += skipped * self.pulse_interval;
            log::debug!("Dropped {skipped} missed pulses");
        }
    }

    /// Change the pulse period; the next pulse fires one new interval from now
    pub fn set_pulse_interval(&mut self, interval: f32) {
        self.pulse_interval = (interval as f64).max(MIN_INTERVAL);
        self.next_pulse = self.now + self.pulse_interval;
    }

    /// Queue a clear `delay` seconds after `from`
    pub fn schedule_clear(&mut self, from: f64, delay: f32, block_id: u32, generation: u32) {
        let task = PendingClear {
            fire_time: from + delay.max(0.0) as f64,
            block_id,
            generation,
        };
        // Clears are nearly always queued in time order; keep the deque sorted anyway
        let at = self
            .pending
            .partition_point(|queued| queued.fire_time <= task.fire_time);
        self.pending.insert(at, task);
    }

    /// Take the earliest event that is due, if any.
    ///
    /// On a tie the clear wins, so a block cleared and re-raised at the same
    /// instant ends up raised.
    pub fn pop_due(&mut self) -> Option<Due> {
        let clear_time = self.pending.front().map(|c| c.fire_time);
        match clear_time {
            Some(t) if t <= self.now && t <= self.next_pulse => {
                self.pending.pop_front().map(Due::Clear)
            }
            _ if self.next_pulse <= self.now => {
                let at = self.next_pulse;
                self.next_pulse += self.pulse_interval;
                Some(Due::Pulse { at })
            }
            _ => None,
        }
    }

    /// Drop every queued clear
    pub fn cancel_pending(&mut self) {
        self.pending.clear();
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
