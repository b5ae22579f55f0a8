//! Parsing and validation of user-supplied dates

use chrono::NaiveDate;

use super::error::{ParseError, RangeError};

const COMPACT_DATE_LEN: usize = 8;

/// Year 0 exists in chrono's proleptic calendar but is not a valid `YYYY`
const MIN_YEAR: i32 = 1;

/// Parse a compact `YYYYMMDD` date.
///
/// Exactly eight ASCII digits naming a real calendar day from 0001-01-01
/// onwards are accepted; anything else is `ParseError::InvalidFormat`.
pub fn parse(input: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidFormat(input.to_string());

    if input.len() != COMPACT_DATE_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = input[0..4].parse().map_err(|_| invalid())?;
    if year < MIN_YEAR {
        return Err(invalid());
    }
    let month: u32 = input[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = input[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Format a date back into the compact `YYYYMMDD` form accepted by `parse`
#[must_use]
pub fn to_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Reject dates after the latest day held by the dataset
pub fn validate_not_future(
    date: NaiveDate,
    latest_known_date: NaiveDate,
) -> Result<(), RangeError> {
    if date > latest_known_date {
        return Err(RangeError::BeyondKnownData {
            latest: latest_known_date,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::summary::LATEST_KNOWN_DATE;
    use rstest::rstest;

    #[rstest]
    #[case("20170823", 2017, 8, 23)]
    #[case("20160101", 2016, 1, 1)]
    #[case("20160229", 2016, 2, 29)]
    #[case("00010101", 1, 1, 1)]
    fn test_parse_valid(#[case] input: &str, #[case] y: i32, #[case] m: u32, #[case] d: u32) {
        let date = parse(input).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(to_compact(date), input);
    }

    #[rstest]
    #[case("")]
    #[case("notadate")]
    #[case("2017082")]
    #[case("201708231")]
    #[case("2017-08-23")]
    #[case("2017O823")]
    #[case("+2017082")]
    #[case("20171301")]
    #[case("20170001")]
    #[case("20170132")]
    #[case("20170230")]
    #[case("20170000")]
    #[case("00000101")]
    #[case("00001231")]
    #[case("２０１７０８２３")]
    fn test_parse_invalid(#[case] input: &str) {
        assert_eq!(
            parse(input),
            Err(ParseError::InvalidFormat(input.to_string()))
        );
    }

    #[test]
    fn test_round_trip_across_a_year() {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        for day in start.iter_days().take(366) {
            assert_eq!(parse(&to_compact(day)).unwrap(), day);
        }
    }

    #[test]
    fn test_validate_not_future() {
        assert!(validate_not_future(LATEST_KNOWN_DATE, LATEST_KNOWN_DATE).is_ok());

        let earlier = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        assert!(validate_not_future(earlier, LATEST_KNOWN_DATE).is_ok());

        let later = NaiveDate::from_ymd_opt(2017, 8, 24).unwrap();
        let err = validate_not_future(later, LATEST_KNOWN_DATE).unwrap_err();
        assert_eq!(err.to_string(), "no data beyond 2017-08-23");
    }
}
