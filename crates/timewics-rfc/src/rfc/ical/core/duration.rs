//! iCalendar DURATION value (RFC 5545 §3.3.6).

use chrono::TimeDelta;

/// A nominal duration as written in the calendar (`P1W`, `PT1H30M`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    /// Whether the duration was written with a leading `-`.
    pub negative: bool,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Duration {
    /// Returns an empty duration.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Returns whether every component is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.weeks == 0 && self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// ## Summary
    /// Converts to a signed `chrono::TimeDelta`; a week is seven days and a day
    /// is 86400 seconds.
    #[must_use]
    pub fn to_time_delta(&self) -> TimeDelta {
        let total = TimeDelta::weeks(i64::from(self.weeks))
            + TimeDelta::days(i64::from(self.days))
            + TimeDelta::hours(i64::from(self.hours))
            + TimeDelta::minutes(i64::from(self.minutes))
            + TimeDelta::seconds(i64::from(self.seconds));

        if self.negative { -total } else { total }
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.weeks > 0 {
            write!(f, "{}W", self.weeks)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            f.write_str("T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        } else if self.weeks == 0 && self.days == 0 {
            f.write_str("T0S")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weeks_are_seven_days() {
        let dur = Duration {
            weeks: 1,
            ..Duration::zero()
        };
        assert_eq!(dur.to_time_delta(), TimeDelta::days(7));
    }

    #[test]
    fn negative_durations_are_signed() {
        let dur = Duration {
            negative: true,
            minutes: 15,
            ..Duration::zero()
        };
        assert_eq!(dur.to_time_delta(), TimeDelta::minutes(-15));
    }

    #[test]
    fn display_renders_components() {
        let dur = Duration {
            days: 1,
            hours: 2,
            minutes: 30,
            ..Duration::zero()
        };
        assert_eq!(dur.to_string(), "P1DT2H30M");
        assert_eq!(Duration::zero().to_string(), "PT0S");
        assert!(Duration::zero().is_zero());
    }
}
