/*
 * Copyright (c) 2025. Cohort Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

//! NUL-terminated text framing for script and structured-data payloads.
//!
//! Script and structured-data messages travel as text with a single
//! trailing NUL byte, so the wire form is `len + 1` bytes for a `len`-byte
//! script.

/// Encodes text into its wire form with a trailing NUL.
#[must_use]
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(text.len() + 1);
    payload.extend_from_slice(text.as_bytes());
    payload.push(0);
    payload
}

/// Decodes a received payload back into text.
///
/// A single trailing NUL is stripped; a payload without one is accepted
/// as-is.
///
/// # Errors
///
/// Returns the underlying UTF-8 error when the payload is not valid text;
/// receivers log and discard such messages.
pub fn decode_text(payload: &[u8]) -> Result<&str, std::str::Utf8Error> {
    let body = match payload.last() {
        Some(0) => &payload[..payload.len() - 1],
        _ => payload,
    };
    std::str::from_utf8(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_appends_a_single_nul() {
        assert_eq!(encode_text("run"), b"run\0".to_vec());
        assert_eq!(encode_text(""), b"\0".to_vec());
    }

    #[test]
    fn decoding_strips_the_terminator() {
        assert_eq!(decode_text(b"run\0").unwrap(), "run");
        assert_eq!(decode_text(b"bare").unwrap(), "bare");
        assert_eq!(decode_text(b"").unwrap(), "");
    }

    #[test]
    fn non_text_payloads_are_rejected() {
        assert!(decode_text(&[0xff, 0xfe, 0x00]).is_err());
    }
}
