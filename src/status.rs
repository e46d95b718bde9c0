//! Typed result vocabularies for catalog commands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::response::AgiResponse;

/// Channel state reported by `CHANNEL STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ChannelStatus {
    /// Channel is down and available.
    DownAvailable,
    /// Channel is down, but reserved.
    DownReserved,
    /// Channel is off hook.
    OffHook,
    /// Digits (or equivalent) have been dialed.
    DigitsDialed,
    /// Line is ringing.
    Ringing,
    /// Remote end is ringing.
    RemoteRinging,
    /// Line is up.
    Up,
    /// Line is busy.
    Busy,
    /// Any result token outside `0`..=`7`, including failures.
    Unknown,
}

impl ChannelStatus {
    /// Map a result token. Only the exact strings `"0"` through `"7"` are recognized.
    pub fn from_result(token: &str) -> Self {
        match token {
            "0" => Self::DownAvailable,
            "1" => Self::DownReserved,
            "2" => Self::OffHook,
            "3" => Self::DigitsDialed,
            "4" => Self::Ringing,
            "5" => Self::RemoteRinging,
            "6" => Self::Up,
            "7" => Self::Busy,
            _ => Self::Unknown,
        }
    }

    /// Numeric code, `-1` for [`Unknown`](Self::Unknown).
    pub fn code(&self) -> i32 {
        match self {
            Self::DownAvailable => 0,
            Self::DownReserved => 1,
            Self::OffHook => 2,
            Self::DigitsDialed => 3,
            Self::Ringing => 4,
            Self::RemoteRinging => 5,
            Self::Up => 6,
            Self::Busy => 7,
            Self::Unknown => -1,
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DownAvailable => "down (available)",
            Self::DownReserved => "down (reserved)",
            Self::OffHook => "off hook",
            Self::DigitsDialed => "digits dialed",
            Self::Ringing => "ringing",
            Self::RemoteRinging => "remote ringing",
            Self::Up => "up",
            Self::Busy => "busy",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Outcome of a prompt that can be interrupted by a keypress.
///
/// The engine reports the key as the decimal ASCII code of the digit
/// (`49` for `1`), `0` when playback finished without a key, and `-1` on
/// error or hangup. Codes that fit none of these are kept in
/// [`Other`](Self::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigitOutcome {
    /// Completed without a keypress.
    NoDigit,
    /// Interrupted by this key.
    Pressed(char),
    /// Error, hangup, or a locally rejected command.
    Failed,
    /// Any other result code, kept as sent.
    Other(i32),
}

impl DigitOutcome {
    /// Decode the result token of a reply.
    pub fn from_response(response: &AgiResponse) -> Self {
        match response.result_code() {
            0 => Self::NoDigit,
            -1 => Self::Failed,
            code => match response.digit() {
                Some(c) => Self::Pressed(c),
                None => Self::Other(code),
            },
        }
    }

    /// Pressed key, if any.
    pub fn digit(&self) -> Option<char> {
        match self {
            Self::Pressed(c) => Some(*c),
            _ => None,
        }
    }

    /// Wire-style code: `0`, the key's ASCII code, `-1`, or the raw code.
    pub fn as_code(&self) -> i32 {
        match self {
            Self::NoDigit => 0,
            Self::Pressed(c) => *c as i32,
            Self::Failed => -1,
            Self::Other(code) => *code,
        }
    }
}
