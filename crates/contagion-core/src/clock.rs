//! World clock and cadence scheduling for the Contagion simulation.
//!
//! The clock is the single source of truth for simulated time. It counts
//! base ticks and maps them onto a calendar: every `ticks_per_day` base
//! ticks the simulated date moves forward one day.
//!
//! Each system (population, resources, journeys) runs on its own period,
//! expressed in base ticks by a [`Cadence`]. A system is due on a tick when
//! the tick number is a multiple of its period.
//!
//! # Design Principles
//!
//! - All temporal derivations use checked arithmetic (no silent overflow).
//! - The date is computed from the tick counter, never stored
//!   independently.

use chrono::{Days, NaiveDate};

use crate::config::CadenceConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid cadence configuration (e.g. a zero period).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// Per-system periods in base ticks. Every period is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    population_every: u64,
    resources_every: u64,
    journeys_every: u64,
}

impl Cadence {
    /// Validate a cadence configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if any period is zero.
    pub fn new(config: &CadenceConfig) -> Result<Self, ClockError> {
        for (name, period) in [
            ("population_every", config.population_every),
            ("resources_every", config.resources_every),
            ("journeys_every", config.journeys_every),
        ] {
            if period == 0 {
                return Err(ClockError::InvalidConfig {
                    reason: format!("{name} must be at least 1"),
                });
            }
        }
        Ok(Self {
            population_every: config.population_every,
            resources_every: config.resources_every,
            journeys_every: config.journeys_every,
        })
    }

    /// Base ticks per simulated day.
    pub const fn population_every(&self) -> u64 {
        self.population_every
    }

    /// Base ticks between resource model updates.
    pub const fn resources_every(&self) -> u64 {
        self.resources_every
    }

    /// Base ticks between journey updates.
    pub const fn journeys_every(&self) -> u64 {
        self.journeys_every
    }

    /// Whether resource models run on `tick`.
    pub const fn resources_due(&self, tick: u64) -> bool {
        is_due(tick, self.resources_every)
    }

    /// Whether journeys run on `tick`.
    pub const fn journeys_due(&self, tick: u64) -> bool {
        is_due(tick, self.journeys_every)
    }
}

/// Whether a system with the given period runs on `tick`. A zero period is
/// never due.
pub const fn is_due(tick: u64, period: u64) -> bool {
    match tick.checked_rem(period) {
        Some(rem) => rem == 0,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// World clock
// ---------------------------------------------------------------------------

/// World clock tracking the base tick and the simulated calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClock {
    /// Current tick number (0 before the first tick runs).
    tick: u64,

    /// Simulated date at tick 0.
    start_date: NaiveDate,

    /// Base ticks per simulated day (at least 1).
    ticks_per_day: u64,
}

impl WorldClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_day` is 0.
    pub fn new(start_date: NaiveDate, ticks_per_day: u64) -> Result<Self, ClockError> {
        Self::from_parts(0, start_date, ticks_per_day)
    }

    /// Create a clock from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_day` is 0.
    pub fn from_parts(
        tick: u64,
        start_date: NaiveDate,
        ticks_per_day: u64,
    ) -> Result<Self, ClockError> {
        if ticks_per_day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "ticks_per_day must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            start_date,
            ticks_per_day,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated date at tick 0.
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Base ticks per simulated day.
    pub const fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }

    /// Whole simulated days elapsed since tick 0.
    pub const fn day(&self) -> u64 {
        match self.tick.checked_div(self.ticks_per_day) {
            Some(day) => day,
            None => 0,
        }
    }

    /// Simulated date: the start date plus [`day`](Self::day) days.
    ///
    /// Saturates at the last date `chrono` can represent.
    pub fn date(&self) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(self.day()))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether the current tick starts a new simulated day.
    pub const fn is_day_boundary(&self) -> bool {
        self.tick > 0 && is_due(self.tick, self.ticks_per_day)
    }
}
