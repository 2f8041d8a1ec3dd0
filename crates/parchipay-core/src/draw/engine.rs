//! Draw reveal engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads or timers - the caller is responsible for calling `tick()`
//! periodically while a draw is in flight.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Shuffling -> Selecting -> Finished
//! ```
//!
//! The winner is decided once, at `start()`, by
//! [`select_winner`](super::select_winner). The
//! Shuffling and Selecting phases are cosmetic: the highlight hops walk the
//! candidate ring on a separately seeded generator and are pinned to land on
//! the already-chosen winner at the final hop. Nothing about the reveal can
//! change or leak the outcome.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::select_winner_index;
use crate::error::Refusal;
use crate::events::Event;
use crate::model::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawState {
    Idle,
    Shuffling,
    Selecting,
    Finished,
}

/// Timing knobs for the reveal. Cosmetic only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DrawPacing {
    /// Duration of the Shuffling phase in milliseconds.
    pub shuffle_ms: u64,
    /// Initial delay between selection hops in milliseconds.
    pub hop_delay_ms: u64,
}

impl Default for DrawPacing {
    fn default() -> Self {
        Self {
            shuffle_ms: 3000,
            hop_delay_ms: 100,
        }
    }
}

/// Animated reveal around a single committed selection.
///
/// One engine handles one draw invocation at a time; `start()` refuses while
/// a draw is in flight, which gives the single-flight-per-committee rule
/// when the caller keeps one engine per committee.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    pacing: DrawPacing,
    /// Fixed seed for reproducible reveals. `None` draws from OS entropy.
    seed: Option<u64>,
    state: DrawState,
    cycle: u32,
    candidates: Vec<Member>,
    winner_index: usize,
    hop_index: Option<usize>,
    hops_done: usize,
    total_hops: usize,
    hop_delay_ms: f64,
    shuffle_until_ms: u64,
    next_hop_at_ms: u64,
}

impl DrawEngine {
    pub fn new(pacing: DrawPacing) -> Self {
        Self {
            pacing,
            seed: None,
            state: DrawState::Idle,
            cycle: 0,
            candidates: Vec::new(),
            winner_index: 0,
            hop_index: None,
            hops_done: 0,
            total_hops: 0,
            hop_delay_ms: 0.0,
            shuffle_until_ms: 0,
            next_hop_at_ms: 0,
        }
    }

    /// Engine with a fixed seed: winner and hop pacing both reproducible.
    pub fn with_seed(pacing: DrawPacing, seed: u64) -> Self {
        let mut engine = Self::new(pacing);
        engine.seed = Some(seed);
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn candidates(&self) -> &[Member] {
        &self.candidates
    }

    /// The committed winner. `Some` only once the reveal has finished.
    pub fn winner(&self) -> Option<&Member> {
        match self.state {
            DrawState::Finished => self.candidates.get(self.winner_index),
            _ => None,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            candidates: self.candidates.len(),
            hops_done: self.hops_done,
            total_hops: self.total_hops,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a draw over a fresh snapshot of the eligible set.
    ///
    /// The winner index is decided here, before any animation runs. Refused
    /// when the set is empty or another draw is mid-reveal.
    pub fn start(&mut self, cycle: u32, candidates: Vec<Member>) -> Result<Event, Refusal> {
        match self.state {
            DrawState::Shuffling | DrawState::Selecting => return Err(Refusal::DrawInFlight),
            DrawState::Idle | DrawState::Finished => {}
        }

        let n = candidates.len();
        // The real selection. Nothing below this line may touch it.
        let winner_index = match self.seed {
            Some(seed) => select_winner_index(n, &mut Mcg128Xsl64::seed_from_u64(seed)),
            None => select_winner_index(n, &mut rand::thread_rng()),
        };
        let Some(winner_index) = winner_index else {
            return Err(Refusal::NoEligibleMembers);
        };
        self.winner_index = winner_index;

        // Cosmetic hop plan on a separate stream: walk the ring a little
        // more than one full lap, then slow down and land on the winner.
        let mut cosmetic = match self.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            None => Mcg128Xsl64::seed_from_u64(rand::thread_rng().gen()),
        };
        self.total_hops = n + cosmetic.gen_range(0..n) + 5;
        self.hops_done = 0;
        self.hop_index = None;
        self.hop_delay_ms = self.pacing.hop_delay_ms as f64;

        let now = now_ms();
        self.shuffle_until_ms = now + self.pacing.shuffle_ms;
        self.cycle = cycle;
        self.candidates = candidates;
        self.state = DrawState::Shuffling;

        Ok(Event::DrawStarted {
            cycle,
            candidates: n,
            at: Utc::now(),
        })
    }

    /// Call periodically while a draw is in flight.
    ///
    /// Emits `CandidateHighlighted` for each cosmetic hop and exactly one
    /// `DrawFinished` on entry to `Finished`; ticking a finished or idle
    /// engine returns `None`.
    pub fn tick(&mut self) -> Option<Event> {
        match self.state {
            DrawState::Shuffling => {
                if now_ms() >= self.shuffle_until_ms {
                    self.state = DrawState::Selecting;
                    self.next_hop_at_ms = now_ms();
                }
                None
            }
            DrawState::Selecting => {
                let now = now_ms();
                if now < self.next_hop_at_ms {
                    return None;
                }
                self.hops_done += 1;
                if self.hops_done >= self.total_hops {
                    // Final hop: pinned to the decision made at start().
                    self.hop_index = Some(self.winner_index);
                    self.state = DrawState::Finished;
                    let winner = &self.candidates[self.winner_index];
                    return Some(Event::DrawFinished {
                        cycle: self.cycle,
                        winner_id: winner.user_id.clone(),
                        winner_name: winner.name.clone(),
                        at: Utc::now(),
                    });
                }
                let next = self
                    .hop_index
                    .map(|i| (i + 1) % self.candidates.len())
                    .unwrap_or(0);
                self.hop_index = Some(next);
                if self.total_hops - self.hops_done <= 5 {
                    // Slow down over the last few hops.
                    self.hop_delay_ms *= 1.4;
                }
                self.next_hop_at_ms = now + self.hop_delay_ms as u64;
                let highlighted = &self.candidates[next];
                Some(Event::CandidateHighlighted {
                    user_id: highlighted.user_id.clone(),
                    name: highlighted.name.clone(),
                    at: Utc::now(),
                })
            }
            DrawState::Idle | DrawState::Finished => None,
        }
    }

    /// Tear down an in-flight draw. No completion event will fire after
    /// this; a finished or idle engine is left untouched.
    pub fn cancel(&mut self) -> Option<Event> {
        match self.state {
            DrawState::Shuffling | DrawState::Selecting => {
                self.state = DrawState::Idle;
                self.candidates.clear();
                self.hop_index = None;
                self.hops_done = 0;
                self.total_hops = 0;
                Some(Event::DrawCancelled { at: Utc::now() })
            }
            DrawState::Idle | DrawState::Finished => None,
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
