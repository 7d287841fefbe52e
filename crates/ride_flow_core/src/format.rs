//! Presentation formatting for quotes: currency amounts and clock times.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::config::DisplayConfig;

pub trait QuoteFormatter {
    fn format_currency(&self, amount: f64) -> String;
    fn format_clock_time(&self, instant: DateTime<Utc>) -> String;
}

/// `$12.46` and `02:05 PM` in a fixed UTC offset.
#[derive(Debug, Clone)]
pub struct DefaultQuoteFormatter {
    currency_symbol: String,
    offset: FixedOffset,
}

impl Default for DefaultQuoteFormatter {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

impl DefaultQuoteFormatter {
    pub fn from_config(display: &DisplayConfig) -> Self {
        let offset = FixedOffset::east_opt(display.utc_offset_minutes * 60).unwrap_or(Utc.fix());
        Self {
            currency_symbol: display.currency_symbol.clone(),
            offset,
        }
    }
}

impl QuoteFormatter for DefaultQuoteFormatter {
    fn format_currency(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, -amount)
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }

    fn format_clock_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%I:%M %p")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_has_two_decimals() {
        let formatter = DefaultQuoteFormatter::default();
        assert_eq!(formatter.format_currency(12.456), "$12.46");
        assert_eq!(formatter.format_currency(5.0), "$5.00");
        assert_eq!(formatter.format_currency(-1.5), "-$1.50");
    }

    #[test]
    fn clock_time_uses_twelve_hour_convention_and_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 23, 19, 5, 0).single().expect("time");
        let utc = DefaultQuoteFormatter::default();
        assert_eq!(utc.format_clock_time(instant), "07:05 PM");

        let new_york = DefaultQuoteFormatter::from_config(&DisplayConfig {
            utc_offset_minutes: -4 * 60,
            currency_symbol: "$".to_string(),
        });
        assert_eq!(new_york.format_clock_time(instant), "03:05 PM");
    }
}
