//! Deterministic `en-US` rendering for currency amounts and account timestamps.
//!
//! Both helpers must be exact-match reproducible—the rendered strings travel into the
//! profile snapshot as-is.

// crates.io
use time::{
	OffsetDateTime, UtcOffset,
	format_description::{BorrowedFormatItem, well_known::Rfc3339},
	macros::format_description,
};
// self
use crate::_prelude::*;

/// Long `en-US` date/time shape, e.g. `June 2, 2006 at 3:04:05 PM UTC`.
const LONG_DATETIME: &[BorrowedFormatItem] = format_description!(
	"[month repr:long] [day padding:none], [year] at [hour repr:12 padding:none]:[minute]:[second] [period case:upper] UTC"
);

/// Formats a dollar amount as `$1,234.50`: grouped thousands, two fraction digits,
/// `-$…` for negatives.
pub fn format_usd(amount: f64) -> String {
	let cents = (amount * 100.0).round() as i64;
	let negative = cents < 0;
	let cents = cents.unsigned_abs();
	let grouped = group_thousands(cents / 100);
	let fraction = cents % 100;

	if negative { format!("-${grouped}.{fraction:02}") } else { format!("${grouped}.{fraction:02}") }
}

/// Renders an RFC 3339 timestamp in the long `en-US` form, normalized to UTC.
pub fn format_long_datetime(timestamp: &str) -> Result<String> {
	let moment = OffsetDateTime::parse(timestamp, &Rfc3339)?.to_offset(UtcOffset::UTC);

	Ok(moment.format(LONG_DATETIME)?)
}

fn group_thousands(value: u64) -> String {
	let digits = value.to_string();
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

	for (idx, digit) in digits.chars().enumerate() {
		if idx > 0 && (digits.len() - idx) % 3 == 0 {
			grouped.push(',');
		}

		grouped.push(digit);
	}

	grouped
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn currency_formatting_is_stable() {
		assert_eq!(format_usd(1_234.5), "$1,234.50");
		assert_eq!(format_usd(0.0), "$0.00");
		assert_eq!(format_usd(2.5), "$2.50");
		assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
		assert_eq!(format_usd(-9.99), "-$9.99");
	}

	#[test]
	fn datetime_formatting_is_stable() {
		assert_eq!(
			format_long_datetime("2006-06-02T15:04:05.000Z")
				.expect("Fixture timestamp should format."),
			"June 2, 2006 at 3:04:05 PM UTC",
		);
		assert_eq!(
			format_long_datetime("2021-01-09T00:01:02Z")
				.expect("Fixture timestamp should format."),
			"January 9, 2021 at 12:01:02 AM UTC",
		);
	}

	#[test]
	fn datetime_formatting_normalizes_offsets_to_utc() {
		assert_eq!(
			format_long_datetime("2006-06-02T15:04:05+02:00")
				.expect("Offset timestamp should format."),
			"June 2, 2006 at 1:04:05 PM UTC",
		);
	}

	#[test]
	fn unparseable_timestamps_propagate() {
		assert!(matches!(
			format_long_datetime("yesterday"),
			Err(Error::Timestamp(_)),
		));
	}
}
