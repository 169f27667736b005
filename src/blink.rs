// Plantey — Blink Scheduler
//
// Randomised eye blinks for the face page.  The eyes stay open for a random
// gap drawn from [BLINK_INTERVAL_MIN_MS, BLINK_INTERVAL_MAX_MS), then close
// for BLINK_DURATION_MS.

use rand::Rng;

use crate::config::*;

pub struct BlinkScheduler<R> {
    rng: R,
    blinking: bool,
    blink_start_ms: u32,
    open_since_ms: u32,
    gap_ms: u32,
}

impl<R: Rng> BlinkScheduler<R> {
    pub fn new(mut rng: R, now_ms: u32) -> Self {
        let gap_ms = draw_gap(&mut rng);
        Self {
            rng,
            blinking: false,
            blink_start_ms: now_ms,
            open_since_ms: now_ms,
            gap_ms,
        }
    }

    /// Advance the schedule; returns `true` while this frame is a blink frame.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if self.blinking {
            if now_ms.wrapping_sub(self.blink_start_ms) >= BLINK_DURATION_MS {
                self.blinking = false;
                self.open_since_ms = now_ms;
                self.gap_ms = draw_gap(&mut self.rng);
            }
        } else if now_ms.wrapping_sub(self.open_since_ms) >= self.gap_ms {
            self.blinking = true;
            self.blink_start_ms = now_ms;
        }
        self.blinking
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    /// Open-eye time scheduled before the next blink.
    pub fn current_gap_ms(&self) -> u32 {
        self.gap_ms
    }
}

fn draw_gap<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(BLINK_INTERVAL_MIN_MS..BLINK_INTERVAL_MAX_MS)
}
