//! Human readable durations for user-facing messages

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Largest unit a formatted duration may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    fn name(self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
        }
    }

    fn millis(self) -> u64 {
        match self {
            TimeUnit::Second => MS_PER_SECOND,
            TimeUnit::Minute => MS_PER_MINUTE,
            TimeUnit::Hour => MS_PER_HOUR,
            TimeUnit::Day => MS_PER_DAY,
        }
    }

    /// How many of this unit fit in the next larger one
    fn modulus(self) -> u64 {
        match self {
            TimeUnit::Second | TimeUnit::Minute => 60,
            TimeUnit::Hour => 24,
            TimeUnit::Day => u64::MAX,
        }
    }
}

/// Format milliseconds as e.g. `"1 hour, 30 minutes"`.
///
/// The largest component is not wrapped, so `max_unit = Hour` renders a day
/// as `"24 hours"`. Zero components are left out; a duration below one
/// second renders as `"0 seconds"`.
pub fn format_duration_ms(ms: u64, max_unit: TimeUnit) -> String {
    let units = [TimeUnit::Day, TimeUnit::Hour, TimeUnit::Minute, TimeUnit::Second];

    let parts: Vec<String> = units
        .iter()
        .filter(|unit| **unit <= max_unit)
        .filter_map(|unit| {
            let whole = ms / unit.millis();
            let value = if *unit == max_unit { whole } else { whole % unit.modulus() };
            (value != 0).then(|| {
                let plural = if value == 1 { "" } else { "s" };
                format!("{} {}{}", value, unit.name(), plural)
            })
        })
        .collect();

    if parts.is_empty() {
        return String::from("0 seconds");
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_duration_ms(120_000, TimeUnit::Day), "2 minutes");
        assert_eq!(format_duration_ms(60_000, TimeUnit::Day), "1 minute");
    }

    #[test]
    fn test_format_mixed_units() {
        assert_eq!(format_duration_ms(5_400_000, TimeUnit::Day), "1 hour, 30 minutes");
        assert_eq!(
            format_duration_ms(90_061_000, TimeUnit::Day),
            "1 day, 1 hour, 1 minute, 1 second"
        );
    }

    #[test]
    fn test_max_unit_caps_largest_component() {
        assert_eq!(format_duration_ms(86_400_000, TimeUnit::Hour), "24 hours");
        assert_eq!(format_duration_ms(86_400_000, TimeUnit::Day), "1 day");
        assert_eq!(format_duration_ms(7_200_000, TimeUnit::Minute), "120 minutes");
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(format_duration_ms(0, TimeUnit::Hour), "0 seconds");
        assert_eq!(format_duration_ms(999, TimeUnit::Day), "0 seconds");
    }
}
