//! The priority model.
//!
//! `Priority` is a closed enum with an explicit rank.  A numerically lower
//! rank is more urgent: `Defense` (rank 0) outranks everything, `Idle`
//! (rank 7) outranks nothing.  The derived `Ord` follows the rank, so
//! `a < b` reads as "a is more urgent than b".
//!
//! There is no "unknown" variant.  Raw integers coming from outside the type
//! system go through [`Priority::try_from`] (strict) or
//! [`Priority::from_rank`] (fails closed to [`Priority::LOWEST`]).

use std::fmt;
use std::str::FromStr;

use crate::UaError;

/// Urgency level of a decision module's request for authority.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Priority {
    /// Protecting the base from an active attack.
    Defense = 0,
    /// Main-army engagements.
    Combat = 1,
    /// Fine-grained unit control inside a fight (kiting, focus fire).
    Micro = 2,
    /// Raids on the opponent's economy.
    Harass = 3,
    /// Denying map positions, expansions, or scouting paths.
    Denial = 4,
    /// Information gathering.
    Scouting = 5,
    /// Worker saturation, gathering, building.
    Economy = 6,
    /// Idle wandering and rallying.
    Idle = 7,
}

impl Priority {
    /// Every level, most urgent first.
    pub const ALL: [Priority; 8] = [
        Priority::Defense,
        Priority::Combat,
        Priority::Micro,
        Priority::Harass,
        Priority::Denial,
        Priority::Scouting,
        Priority::Economy,
        Priority::Idle,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const HIGHEST: Priority = Priority::Defense;
    pub const LOWEST: Priority = Priority::Idle;

    /// Numeric rank; lower is more urgent.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Dense index in `0..COUNT`, for per-level lookup tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `true` when `self` may evict a lease held at `other`.
    ///
    /// Only a strictly more urgent level preempts; equal levels never do.
    #[inline]
    pub fn outranks(self, other: Priority) -> bool {
        self.rank() < other.rank()
    }

    /// Convert a raw rank, failing closed.
    ///
    /// An unranked value is treated as [`Priority::LOWEST`] so a malformed
    /// caller can never win a contest it should not.
    pub fn from_rank(rank: u8) -> Priority {
        match Priority::try_from(rank) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("{e}; treating as {}", Priority::LOWEST);
                Priority::LOWEST
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Priority::Defense  => "defense",
            Priority::Combat   => "combat",
            Priority::Micro    => "micro",
            Priority::Harass   => "harass",
            Priority::Denial   => "denial",
            Priority::Scouting => "scouting",
            Priority::Economy  => "economy",
            Priority::Idle     => "idle",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = UaError;

    fn try_from(rank: u8) -> Result<Priority, UaError> {
        Priority::ALL
            .get(rank as usize)
            .copied()
            .ok_or(UaError::UnrankedPriority(rank))
    }
}

impl From<Priority> for u8 {
    #[inline]
    fn from(p: Priority) -> u8 {
        p.rank()
    }
}

impl FromStr for Priority {
    type Err = UaError;

    fn from_str(s: &str) -> Result<Priority, UaError> {
        Priority::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UaError::UnknownPriorityName(s.to_owned()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
