//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter supplied by the game
//! loop.  Lease windows, sweep intervals and reporting windows are all
//! measured in ticks, so arithmetic is exact and comparisons are O(1).
//!
//! `TickClock` maps ticks to game seconds for logging and for converting
//! human-friendly durations ("hold this unit for 5 s") into tick counts.
//! The default rate is 22.4 ticks per game second.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`; at 22.4 ticks/s it cannot overflow in any real session.
/// Offsets saturate anyway so a pathological lease duration can never wrap
/// an expiry into the past.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
    pub const MAX: Tick = Tick(u64::MAX);

    /// Return the tick `n` steps after `self`, saturating at `Tick::MAX`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `true` on ticks that are a multiple of `interval`.  An interval of 0
    /// never fires.
    #[inline]
    pub fn is_every(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.since(rhs)
    }
}

impl From<u64> for Tick {
    #[inline]
    fn from(raw: u64) -> Tick {
        Tick(raw)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Converts between tick counts and game seconds.
///
/// `TickClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Game-loop ticks per simulated second.  Default: 22.4.
    pub ticks_per_sec: f64,
    /// The current tick: advanced by `TickClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl TickClock {
    pub const DEFAULT_TICKS_PER_SEC: f64 = 22.4;

    pub fn new(ticks_per_sec: f64) -> Self {
        Self { ticks_per_sec, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.offset(1);
    }

    /// Elapsed game seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.ticks_per_sec
    }

    /// How many ticks span `secs` game seconds? (rounds up; never 0 for a
    /// positive duration)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        (secs * self.ticks_per_sec).ceil().max(0.0) as u64
    }

    /// Break elapsed time into (minutes, seconds) for log lines.
    pub fn elapsed_min_sec(&self) -> (u64, u32) {
        let total = self.elapsed_secs().max(0.0) as u64;
        (total / 60, (total % 60) as u32)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICKS_PER_SEC)
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.elapsed_min_sec();
        write!(f, "{} ({:02}:{:02})", self.current_tick, m, s)
    }
}
