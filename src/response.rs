//! Reply line decoding

use std::fmt;

use crate::{
    constants::{LINE_TERMINATOR, STATUS_OK},
    error::{AgiError, AgiResult},
};

define_wire_enum! {
    error_type: ParseReplyAnnotationError,
    /// Parenthesized markers the engine appends to reply data.
    pub enum ReplyAnnotation {
        Timeout => "(timeout)",
        Hangup => "(hangup)",
        Dtmf => "(dtmf)",
        WriteFile => "(writefile)",
        WaitFor => "(waitfor)",
        RandomError => "(randomerror)",
    }
}

/// Error returned when parsing an unknown reply annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReplyAnnotationError(pub String);

impl fmt::Display for ParseReplyAnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reply annotation: {}", self.0)
    }
}

impl std::error::Error for ParseReplyAnnotationError {}

/// C `atoi`: optional leading whitespace and sign, then decimal digits.
/// Anything unparseable is 0.
pub(crate) fn leading_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Decoded reply line: `<status> result=<token>[ <data>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgiResponse {
    status_code: String,
    result: String,
    data: String,
}

impl AgiResponse {
    /// Decode one reply line, which must still carry its trailing newline.
    ///
    /// ```
    /// use asterisk_agi_tokio::AgiResponse;
    ///
    /// let resp = AgiResponse::parse("200 result=1 endpos=160\n").unwrap();
    /// assert_eq!(resp.status_code(), "200");
    /// assert_eq!(resp.result(), "1");
    /// assert_eq!(resp.data(), "endpos=160");
    /// ```
    pub fn parse(line: &str) -> AgiResult<Self> {
        let Some(body) = line.strip_suffix(LINE_TERMINATOR) else {
            return Err(AgiError::protocol_desync(line, "reply is not newline terminated"));
        };
        let Some((status_code, rest)) = body.split_once(' ') else {
            return Err(AgiError::protocol_desync(line, "no space after status code"));
        };
        let Some((_label, value)) = rest.split_once('=') else {
            return Err(AgiError::protocol_desync(line, "no '=' introducing the result"));
        };
        let (result, data) = value
            .split_once(' ')
            .unwrap_or((value, ""));

        Ok(Self {
            status_code: status_code.to_string(),
            result: result.to_string(),
            data: data.to_string(),
        })
    }

    /// Reply synthesized locally for a command that was never sent.
    pub fn dummy(result: &str, data: &str) -> Self {
        Self {
            status_code: STATUS_OK.to_string(),
            result: result.to_string(),
            data: data.to_string(),
        }
    }

    /// Status code text, `200` for normal completion.
    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    /// Status code as a number, if it is one.
    pub fn status(&self) -> Option<u16> {
        self.status_code
            .parse()
            .ok()
    }

    /// `true` if the engine completed the command normally.
    pub fn is_ok(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// The token following `result=`.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Result token read as a leading integer, 0 if it has none.
    pub fn result_code(&self) -> i32 {
        leading_int(&self.result)
    }

    /// Everything after the result token, empty if absent.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// `data` when the result token is `"1"`, otherwise empty.
    pub fn value(&self) -> &str {
        if self.result == "1" {
            &self.data
        } else {
            ""
        }
    }

    /// Playback position from an `endpos=<n>` marker in `data`.
    pub fn endpos(&self) -> Option<u64> {
        let (_, rest) = self
            .data
            .split_once("endpos=")?;
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        rest[..end]
            .parse()
            .ok()
    }

    /// First known parenthesized annotation present in `data`.
    pub fn annotation(&self) -> Option<ReplyAnnotation> {
        ReplyAnnotation::ALL
            .iter()
            .copied()
            .find(|a| {
                self.data
                    .contains(a.as_str())
            })
    }

    /// Result token decoded as the decimal ASCII code of a keypress.
    ///
    /// `0`, negative values and codes outside the ASCII range yield `None`.
    pub fn digit(&self) -> Option<char> {
        let code = self.result_code();
        u8::try_from(code)
            .ok()
            .filter(|c| *c != 0 && c.is_ascii())
            .map(char::from)
    }

    /// Consume into `(status_code, result, data)`.
    pub fn into_parts(self) -> (String, String, String) {
        (self.status_code, self.result, self.data)
    }
}

impl fmt::Display for AgiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} result={}", self.status_code, self.result)?;
        if !self
            .data
            .is_empty()
        {
            write!(f, " {}", self.data)?;
        }
        Ok(())
    }
}
