//! Session context sent by the engine before the first command.
//!
//! The startup block is a run of `name: value` lines terminated by an empty
//! line. The first [`SESSION_FIELD_COUNT`] lines carry fixed call metadata and
//! are routed by position through [`SessionField::ALL`]; every later line is a
//! script argument (`agi_arg_1`, `agi_arg_2`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, trace};

use crate::{
    constants::{EMPTY_FIELD, LINE_TERMINATOR, MAX_ARGS, SESSION_FIELD_COUNT},
    error::{AgiError, AgiResult},
};

define_wire_enum! {
    error_type: ParseSessionFieldError,
    /// Positional fields of the startup block, in the order the engine sends them.
    pub enum SessionField {
        Request => "agi_request",
        Channel => "agi_channel",
        Language => "agi_language",
        Type => "agi_type",
        UniqueId => "agi_uniqueid",
        Version => "agi_version",
        CallerId => "agi_callerid",
        CallerIdName => "agi_calleridname",
        CallingPres => "agi_callingpres",
        CallingAni2 => "agi_callingani2",
        CallingTon => "agi_callington",
        CallingTns => "agi_callingtns",
        Dnid => "agi_dnid",
        Rdnis => "agi_rdnis",
        Context => "agi_context",
        Extension => "agi_extension",
        Priority => "agi_priority",
        Enhanced => "agi_enhanced",
        AccountCode => "agi_accountcode",
        ThreadId => "agi_threadid",
    }
}

/// Error returned when parsing an unknown session field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSessionFieldError(pub String);

impl fmt::Display for ParseSessionFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown session field: {}", self.0)
    }
}

impl std::error::Error for ParseSessionFieldError {}

/// Call metadata captured once at session start.
///
/// Values never contain newlines and are never empty: a field the engine
/// left blank (or did not send) holds a single space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct SessionContext {
    pub request: String,
    pub channel: String,
    pub language: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub unique_id: String,
    pub version: String,
    pub caller_id: String,
    pub caller_id_name: String,
    pub calling_pres: String,
    pub calling_ani2: String,
    pub calling_ton: String,
    pub calling_tns: String,
    pub dnid: String,
    pub rdnis: String,
    pub context: String,
    pub extension: String,
    pub priority: String,
    pub enhanced: String,
    pub account_code: String,
    pub thread_id: String,
    /// Script arguments in the order they were passed to the AGI application.
    pub args: Vec<String>,
}

impl Default for SessionContext {
    fn default() -> Self {
        let blank = || EMPTY_FIELD.to_string();
        Self {
            request: blank(),
            channel: blank(),
            language: blank(),
            channel_type: blank(),
            unique_id: blank(),
            version: blank(),
            caller_id: blank(),
            caller_id_name: blank(),
            calling_pres: blank(),
            calling_ani2: blank(),
            calling_ton: blank(),
            calling_tns: blank(),
            dnid: blank(),
            rdnis: blank(),
            context: blank(),
            extension: blank(),
            priority: blank(),
            enhanced: blank(),
            account_code: blank(),
            thread_id: blank(),
            args: Vec::new(),
        }
    }
}

impl SessionContext {
    /// Value of a positional field.
    pub fn field(&self, field: SessionField) -> &str {
        match field {
            SessionField::Request => &self.request,
            SessionField::Channel => &self.channel,
            SessionField::Language => &self.language,
            SessionField::Type => &self.channel_type,
            SessionField::UniqueId => &self.unique_id,
            SessionField::Version => &self.version,
            SessionField::CallerId => &self.caller_id,
            SessionField::CallerIdName => &self.caller_id_name,
            SessionField::CallingPres => &self.calling_pres,
            SessionField::CallingAni2 => &self.calling_ani2,
            SessionField::CallingTon => &self.calling_ton,
            SessionField::CallingTns => &self.calling_tns,
            SessionField::Dnid => &self.dnid,
            SessionField::Rdnis => &self.rdnis,
            SessionField::Context => &self.context,
            SessionField::Extension => &self.extension,
            SessionField::Priority => &self.priority,
            SessionField::Enhanced => &self.enhanced,
            SessionField::AccountCode => &self.account_code,
            SessionField::ThreadId => &self.thread_id,
        }
    }

    fn field_mut(&mut self, field: SessionField) -> &mut String {
        match field {
            SessionField::Request => &mut self.request,
            SessionField::Channel => &mut self.channel,
            SessionField::Language => &mut self.language,
            SessionField::Type => &mut self.channel_type,
            SessionField::UniqueId => &mut self.unique_id,
            SessionField::Version => &mut self.version,
            SessionField::CallerId => &mut self.caller_id,
            SessionField::CallerIdName => &mut self.caller_id_name,
            SessionField::CallingPres => &mut self.calling_pres,
            SessionField::CallingAni2 => &mut self.calling_ani2,
            SessionField::CallingTon => &mut self.calling_ton,
            SessionField::CallingTns => &mut self.calling_tns,
            SessionField::Dnid => &mut self.dnid,
            SessionField::Rdnis => &mut self.rdnis,
            SessionField::Context => &mut self.context,
            SessionField::Extension => &mut self.extension,
            SessionField::Priority => &mut self.priority,
            SessionField::Enhanced => &mut self.enhanced,
            SessionField::AccountCode => &mut self.account_code,
            SessionField::ThreadId => &mut self.thread_id,
        }
    }

    /// Script argument by zero-based index.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args
            .get(index)
            .map(|s| s.as_str())
    }

    /// `true` for EAGI sessions, where audio is also available on fd 3.
    pub fn is_enhanced(&self) -> bool {
        self.enhanced
            .trim()
            .parse::<f32>()
            .map(|v| v > 0.0)
            .unwrap_or(false)
    }

    /// Drain a startup block from `reader`, stopping right after the empty
    /// terminator line so the next read sees the first command reply.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub async fn read_from<R>(reader: &mut R, max_args: usize) -> AgiResult<Self>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut block = StartupBlock::new(max_args);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await?;
            if n == 0 {
                return Err(AgiError::startup_format(format!(
                    "stream ended after {} lines without a blank terminator",
                    block.lines
                )));
            }
            // Caller names may arrive in the channel's legacy charset.
            let line = String::from_utf8_lossy(&buf);
            if block.accept(&line)? {
                return Ok(block.finish());
            }
        }
    }

    /// Parse a complete startup block held in memory.
    ///
    /// Anything after the blank terminator line is ignored.
    pub fn from_block(text: &str, max_args: usize) -> AgiResult<Self> {
        let mut block = StartupBlock::new(max_args);
        for line in text.split_inclusive(LINE_TERMINATOR) {
            if block.accept(line)? {
                return Ok(block.finish());
            }
        }
        Err(AgiError::startup_format(format!(
            "block ended after {} lines without a blank terminator",
            block.lines
        )))
    }
}

/// Incremental startup block parser shared by the async and in-memory readers.
struct StartupBlock {
    context: SessionContext,
    max_args: usize,
    lines: usize,
}

impl StartupBlock {
    fn new(max_args: usize) -> Self {
        Self {
            context: SessionContext::default(),
            max_args,
            lines: 0,
        }
    }

    /// Returns `true` once the blank terminator line has been consumed.
    fn accept(&mut self, line: &str) -> AgiResult<bool> {
        let Some(line) = line.strip_suffix(LINE_TERMINATOR) else {
            return Err(AgiError::startup_format(format!(
                "line {} is not newline terminated: {:?}",
                self.lines + 1,
                line
            )));
        };
        if line.is_empty() {
            return Ok(true);
        }
        self.lines += 1;

        let Some((name, value)) = line.split_once(':') else {
            return Err(AgiError::startup_format(format!(
                "line {} has no ':' separator: {:?}",
                self.lines, line
            )));
        };
        let value = value
            .strip_prefix(' ')
            .unwrap_or(value);
        let value = if value.is_empty() { EMPTY_FIELD } else { value };
        trace!("[STARTUP] {} = {:?}", name, value);

        let position = self.lines - 1;
        if position < SESSION_FIELD_COUNT {
            let field = SessionField::ALL[position];
            if !name.eq_ignore_ascii_case(field.as_str()) {
                debug!(
                    "[STARTUP] line {} named {:?}, storing as {}",
                    self.lines, name, field
                );
            }
            *self
                .context
                .field_mut(field) = value.to_string();
        } else {
            if self
                .context
                .args
                .len()
                >= self.max_args
            {
                return Err(AgiError::startup_format(format!(
                    "more than {} script arguments",
                    self.max_args
                )));
            }
            self.context
                .args
                .push(value.to_string());
        }
        Ok(false)
    }

    fn finish(self) -> SessionContext {
        debug!(
            "[STARTUP] session context read: {} lines, {} args",
            self.lines,
            self.context
                .args
                .len()
        );
        self.context
    }
}

/// Convenience for the common case of the default argument limit.
impl std::str::FromStr for SessionContext {
    type Err = AgiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_block(s, MAX_ARGS)
    }
}
