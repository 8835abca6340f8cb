/*
 * warning.rs
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

//! `Warning` header elements.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::error::HeaderError;
use crate::headers::date::{format_http_date, parse_http_date, whole_seconds};
use crate::headers::rules::{host_length, number_length, quoted_string_length, whitespace_length, ParseResult};
use crate::headers::utilities::check_valid_quoted_string;

use super::{parse_single, try_parse_single};

/// `warn-code SP warn-agent SP warn-text [ SP "\"" HTTP-date "\"" ]`
#[derive(Debug, Clone)]
pub struct Warning {
    code: u16,
    agent: String,
    text: String,
    date: Option<DateTime<Utc>>,
}

impl Warning {
    /// `text` is a quoted-string including its quotes.
    pub fn new(code: i32, agent: impl Into<String>, text: impl Into<String>) -> Result<Self, HeaderError> {
        let agent = agent.into();
        let text = text.into();
        let code = check_code(code)?;
        check_agent(&agent)?;
        check_valid_quoted_string(&text, "text")?;
        Ok(Self { code, agent, text, date: None })
    }

    /// Sub-second precision in `date` is dropped.
    pub fn with_date(
        code: i32,
        agent: impl Into<String>,
        text: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self, HeaderError> {
        let mut warning = Self::new(code, agent, text)?;
        warning.date = Some(whole_seconds(date));
        Ok(warning)
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::warning_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::warning_length)
    }

    pub(crate) fn warning_length(input: &str, start: usize) -> Option<(usize, Self)> {
        if start >= input.len() {
            return None;
        }
        let mut current = start;
        let code = read_code(input, &mut current)?;
        let agent = read_agent(input, &mut current)?;
        let ParseResult::Parsed(text_len) = quoted_string_length(input, current) else {
            return None;
        };
        let text = input[current..current + text_len].to_string();
        current += text_len;
        let date = read_date(input, &mut current)?;
        Some((current - start, Self { code, agent, text, date }))
    }
}

/// One to three digits followed by required whitespace.
fn read_code(input: &str, current: &mut usize) -> Option<u16> {
    let len = number_length(input, *current, false);
    if len == 0 || len > 3 {
        return None;
    }
    let code = input[*current..*current + len].parse::<u16>().ok()?;
    *current += len;
    let ws = whitespace_length(input, *current);
    *current += ws;
    (ws != 0 && *current != input.len()).then_some(code)
}

fn read_agent(input: &str, current: &mut usize) -> Option<String> {
    let (len, agent) = host_length(input, *current, true)?;
    let agent = agent.to_string();
    *current += len;
    let ws = whitespace_length(input, *current);
    *current += ws;
    (ws != 0 && *current != input.len()).then_some(agent)
}

/// The optional quoted date. Outer None is a parse failure; inner None means no date.
fn read_date(input: &str, current: &mut usize) -> Option<Option<DateTime<Utc>>> {
    let bytes = input.as_bytes();
    let ws = whitespace_length(input, *current);
    *current += ws;
    if *current >= bytes.len() || bytes[*current] != b'"' {
        return Some(None);
    }
    if ws == 0 {
        return None;
    }
    *current += 1;
    let date_start = *current;
    while *current < bytes.len() && bytes[*current] != b'"' {
        *current += 1;
    }
    if *current == bytes.len() || *current == date_start {
        return None;
    }
    let date = parse_http_date(&input[date_start..*current])?;
    *current += 1;
    *current += whitespace_length(input, *current);
    Some(Some(date))
}

fn check_code(code: i32) -> Result<u16, HeaderError> {
    if !(0..=999).contains(&code) {
        return Err(HeaderError::out_of_range("code"));
    }
    Ok(code as u16)
}

fn check_agent(agent: &str) -> Result<(), HeaderError> {
    if agent.is_empty() {
        return Err(HeaderError::empty("agent"));
    }
    match host_length(agent, 0, true) {
        Some((len, _)) if len == agent.len() => Ok(()),
        _ => Err(HeaderError::invalid_value(agent)),
    }
}

impl PartialEq for Warning {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.agent.eq_ignore_ascii_case(&other.agent)
            && self.text == other.text
            && self.date == other.date
    }
}

impl Eq for Warning {}

impl Hash for Warning {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.agent.to_ascii_lowercase().hash(state);
        self.text.hash(state);
        self.date.hash(state);
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03} {} {}", self.code, self.agent, self.text)?;
        if let Some(date) = &self.date {
            write!(f, " \"{}\"", format_http_date(date))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_with_date() {
        let w = Warning::parse("110 cache:80 \"Response is stale\" \"Sun, 06 Nov 1994 08:49:37 GMT\"").unwrap();
        assert_eq!(w.code(), 110);
        assert_eq!(w.agent(), "cache:80");
        assert_eq!(w.text(), "\"Response is stale\"");
        assert_eq!(w.date(), Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).single());
    }

    #[test]
    fn pads_code() {
        let w = Warning::new(7, "agent", "\"x\"").unwrap();
        assert_eq!(w.to_string(), "007 agent \"x\"");
        assert_eq!(Warning::parse("007 agent \"x\"").unwrap(), w);
    }

    #[test]
    fn rejects_malformed() {
        assert!(Warning::try_parse("1000 agent \"x\"").is_none());
        assert!(Warning::try_parse("199 agent").is_none());
        assert!(Warning::try_parse("199 agent x").is_none());
        assert!(Warning::try_parse("199 agent \"x\"\"Sun, 06 Nov 1994 08:49:37 GMT\"").is_none());
        assert!(Warning::try_parse("199 agent \"x\" \"not a date\"").is_none());
    }

    #[test]
    fn constructor_checks_code() {
        assert!(matches!(Warning::new(1000, "a", "\"x\""), Err(HeaderError::ArgumentOutOfRange(_))));
        assert!(matches!(Warning::new(-1, "a", "\"x\""), Err(HeaderError::ArgumentOutOfRange(_))));
        assert!(matches!(Warning::new(199, "", "\"x\""), Err(HeaderError::Argument(_))));
        assert!(matches!(Warning::new(199, "a", "x"), Err(HeaderError::Format(_))));
    }

    #[test]
    fn date_drops_sub_seconds() {
        let when = Utc.timestamp_opt(784_111_777, 500_000_000).unwrap();
        let w = Warning::with_date(110, "example.com", "\"stale\"", when).unwrap();
        assert_eq!(w.date(), Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).single());
        assert_eq!(w.to_string(), "110 example.com \"stale\" \"Sun, 06 Nov 1994 08:49:37 GMT\"");
        assert_eq!(Warning::parse(&w.to_string()).unwrap(), w);
    }
}
