/*
 * encoding.rs
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

//! Encodings for non-ASCII parameter values: RFC 2047 encoded words (`name`, `filename`) and
//! RFC 5987 extended values (`filename*`).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

/// Everything outside `attr-char`: non-token characters plus `*`, `'` and `%`.
const EXT_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'{')
    .add(b'}');

pub fn is_quoted(value: &str) -> bool {
    value.len() > 1 && value.starts_with('"') && value.ends_with('"')
}

pub fn requires_encoding(value: &str) -> bool {
    !value.is_ascii()
}

/// `=?utf-8?B?<base64>?=`
pub fn encode_mime(value: &str) -> String {
    format!("=?utf-8?B?{}?=", STANDARD.encode(value.as_bytes()))
}

/// Decodes a quoted, B-encoded word such as `"=?utf-8?B?w6k=?="`. Returns None for anything
/// else, including Q encoding and unknown charsets.
pub fn decode_mime(value: &str) -> Option<String> {
    if !is_quoted(value) || value.len() < 10 {
        return None;
    }
    let parts: Vec<&str> = value.split('?').collect();
    if parts.len() != 5 || parts[0] != "\"=" || parts[4] != "=\"" || !parts[2].eq_ignore_ascii_case("b") {
        return None;
    }
    let bytes = match STANDARD.decode(parts[3]) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(value, error = %e, "invalid base64 in encoded word");
            return None;
        }
    };
    decode_charset(&bytes, parts[1])
}

/// `utf-8''<pct-encoded>`
pub fn encode_5987(value: &str) -> String {
    format!("utf-8''{}", utf8_percent_encode(value, EXT_VALUE))
}

/// Decodes `charset'language'pct-encoded`. The language tag is ignored.
pub fn decode_5987(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split('\'').collect();
    if parts.len() != 3 {
        return None;
    }
    let bytes: Vec<u8> = percent_decode_str(parts[2]).collect();
    decode_charset(&bytes, parts[0])
}

fn decode_charset(bytes: &[u8], charset: &str) -> Option<String> {
    match charset.trim().to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Some(String::from_utf8_lossy(bytes).into_owned()),
        "us-ascii" | "ascii" => Some(bytes.iter().map(|&b| if b.is_ascii() { b as char } else { '?' }).collect()),
        "iso-8859-1" | "latin1" | "iso_8859-1" => Some(bytes.iter().map(|&b| b as char).collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_round_trip() {
        let encoded = encode_mime("résumé.pdf");
        assert!(encoded.starts_with("=?utf-8?B?"));
        assert_eq!(decode_mime(&format!("\"{}\"", encoded)).as_deref(), Some("résumé.pdf"));
    }

    #[test]
    fn mime_rejects_other_shapes() {
        assert_eq!(decode_mime("=?utf-8?B?YQ==?="), None);
        assert_eq!(decode_mime("\"=?utf-8?Q?a?=\""), None);
        assert_eq!(decode_mime("\"=?klingon?B?YQ==?=\""), None);
        assert_eq!(decode_mime("\"=?utf-8?B?!!!?=\""), None);
    }

    #[test]
    fn ext_value() {
        assert_eq!(encode_5987("a b*.txt"), "utf-8''a%20b%2A.txt");
        assert_eq!(encode_5987("é"), "utf-8''%C3%A9");
        assert_eq!(decode_5987("utf-8'en'%C3%A9t%C3%A9").as_deref(), Some("été"));
        assert_eq!(decode_5987("iso-8859-1''%E9").as_deref(), Some("é"));
        assert_eq!(decode_5987("no-quotes"), None);
    }
}
