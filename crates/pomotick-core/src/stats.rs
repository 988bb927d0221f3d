//! Daily completion statistics.
//!
//! Counters are bucketed by local calendar day. The rollover check runs once
//! per process start, when the persisted document is loaded -- a session that
//! stays alive across local midnight keeps accumulating into the old day's
//! bucket until the next restart. That is a documented limitation of the
//! design, not something to correct per tick.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub completed_work_cycles_today: u32,
    #[serde(default)]
    pub work_minutes_today: f64,
    #[serde(default = "today")]
    pub last_reset_date: NaiveDate,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            completed_work_cycles_today: 0,
            work_minutes_today: 0.0,
            last_reset_date: today(),
        }
    }
}

impl Statistics {
    /// Zero the counters if `current_date` differs from the stored date.
    ///
    /// Returns true when a rollover happened, so the caller can persist the
    /// updated date.
    pub fn roll_over(&mut self, current_date: NaiveDate) -> bool {
        if self.last_reset_date == current_date {
            return false;
        }
        self.completed_work_cycles_today = 0;
        self.work_minutes_today = 0.0;
        self.last_reset_date = current_date;
        true
    }

    /// Called once at load time.
    pub fn roll_over_today(&mut self) -> bool {
        self.roll_over(today())
    }

    /// One second of work-phase countdown elapsed.
    pub fn record_work_second(&mut self) {
        self.work_minutes_today += 1.0 / 60.0;
    }

    /// A work phase ran to completion.
    pub fn record_work_completion(&mut self) {
        self.completed_work_cycles_today += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn same_day_keeps_counters() {
        let mut stats = Statistics {
            completed_work_cycles_today: 3,
            work_minutes_today: 70.5,
            last_reset_date: today(),
        };
        assert!(!stats.roll_over_today());
        assert_eq!(stats.completed_work_cycles_today, 3);
        assert_eq!(stats.work_minutes_today, 70.5);
    }

    #[test]
    fn stale_date_zeroes_counters_and_updates_date() {
        let yesterday = today() - Duration::days(1);
        let mut stats = Statistics {
            completed_work_cycles_today: 8,
            work_minutes_today: 200.0,
            last_reset_date: yesterday,
        };
        assert!(stats.roll_over_today());
        assert_eq!(stats.completed_work_cycles_today, 0);
        assert_eq!(stats.work_minutes_today, 0.0);
        assert_eq!(stats.last_reset_date, today());
    }

    #[test]
    fn sixty_work_seconds_make_one_minute() {
        let mut stats = Statistics::default();
        for _ in 0..60 {
            stats.record_work_second();
        }
        assert!((stats.work_minutes_today - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_default_to_today() {
        let stats: Statistics = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.completed_work_cycles_today, 0);
        assert_eq!(stats.last_reset_date, today());
    }
}
