/*
 * date.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Intestazioni, an HTTP client library.
 *
 * Intestazioni is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Intestazioni is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Intestazioni.  If not, see <http://www.gnu.org/licenses/>.
 */

//! HTTP-date parsing and formatting (RFC 7231 section 7.1.1.1).
//!
//! Accepts IMF-fixdate (RFC 1123), the obsolete RFC 850 form and asctime, plus the lenient
//! variants seen in the wild (missing weekday, two-digit year, numeric zone). Always emits
//! IMF-fixdate.

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};

/// Formats carrying a literal GMT or no zone at all; both are read as UTC.
const UTC_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S GMT",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S GMT",
    "%d %b %Y %H:%M:%S",
    "%a, %d %b %y %H:%M:%S GMT",
    "%a, %d %b %y %H:%M:%S",
    "%d %b %y %H:%M:%S GMT",
    "%d %b %y %H:%M:%S",
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S",
    "%a %b %d %H:%M:%S %Y",
];

/// Formats with an explicit numeric offset.
const ZONED_FORMATS: &[&str] = &["%a, %d %b %Y %H:%M:%S %z", "%d %b %Y %H:%M:%S %z"];

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse an HTTP-date. Returns None on any malformed or ambiguous input.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    UTC_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .or_else(|| {
            ZONED_FORMATS
                .iter()
                .find_map(|f| DateTime::parse_from_str(value, f).ok())
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// HTTP-dates carry whole seconds; finer precision is dropped.
pub fn whole_seconds(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(0)
}

/// Format as IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_http_date(date: &DateTime<Utc>) -> String {
    date.format(IMF_FIXDATE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).single().unwrap()
    }

    #[test]
    fn rfc1123() {
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT"), Some(expected()));
    }

    #[test]
    fn rfc850() {
        assert_eq!(parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"), Some(expected()));
    }

    #[test]
    fn asctime() {
        assert_eq!(parse_http_date("Sun Nov  6 08:49:37 1994"), Some(expected()));
    }

    #[test]
    fn lenient_forms() {
        assert_eq!(parse_http_date("  06 Nov 1994 08:49:37 GMT "), Some(expected()));
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 09:49:37 +0100"), Some(expected()));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_http_date(""), None);
        assert_eq!(parse_http_date("yesterday"), None);
        assert_eq!(parse_http_date("Mon, 06 Nov 1994 08:49:37 GMT"), None);
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT x"), None);
    }

    #[test]
    fn formats_imf_fixdate() {
        assert_eq!(format_http_date(&expected()), "Sun, 06 Nov 1994 08:49:37 GMT");
        let d = parse_http_date("Tue, 1 Feb 2011 03:04:05 GMT").unwrap();
        assert_eq!(d.day(), 1);
        assert_eq!(format_http_date(&d), "Tue, 01 Feb 2011 03:04:05 GMT");
    }

    #[test]
    fn whole_seconds_truncates() {
        let d = Utc.timestamp_opt(1_296_529_445, 999_999_999).unwrap();
        assert_eq!(whole_seconds(d), Utc.timestamp_opt(1_296_529_445, 0).unwrap());
        assert_eq!(parse_http_date(&format_http_date(&d)), Some(whole_seconds(d)));
    }
}
