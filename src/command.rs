//! Command line encoding

use std::fmt;

use crate::{
    constants::{LINE_TERMINATOR, NO_DIGITS},
    error::{AgiError, AgiResult},
    response::AgiResponse,
};

define_wire_enum! {
    error_type: ParseAgiVerbError,
    /// Command keywords understood by the engine.
    pub enum AgiVerb {
        Answer => "ANSWER",
        ChannelStatus => "CHANNEL STATUS",
        ControlStreamFile => "CONTROL STREAM FILE",
        DatabaseDel => "DATABASE DEL",
        DatabaseDeltree => "DATABASE DELTREE",
        DatabaseGet => "DATABASE GET",
        DatabasePut => "DATABASE PUT",
        Exec => "EXEC",
        GetData => "GET DATA",
        GetFullVariable => "GET FULL VARIABLE",
        GetOption => "GET OPTION",
        GetVariable => "GET VARIABLE",
        Gosub => "GOSUB",
        Hangup => "HANGUP",
        Noop => "NOOP",
        ReceiveChar => "RECEIVE CHAR",
        ReceiveText => "RECEIVE TEXT",
        RecordFile => "RECORD FILE",
        SayAlpha => "SAY ALPHA",
        SayDate => "SAY DATE",
        SayDatetime => "SAY DATETIME",
        SayDigits => "SAY DIGITS",
        SayNumber => "SAY NUMBER",
        SayPhonetic => "SAY PHONETIC",
        SayTime => "SAY TIME",
        SendImage => "SEND IMAGE",
        SendText => "SEND TEXT",
        SetAutohangup => "SET AUTOHANGUP",
        SetCallerid => "SET CALLERID",
        SetContext => "SET CONTEXT",
        SetExtension => "SET EXTENSION",
        SetMusic => "SET MUSIC",
        SetPriority => "SET PRIORITY",
        SetVariable => "SET VARIABLE",
        SpeechActivateGrammar => "SPEECH ACTIVATE GRAMMAR",
        SpeechCreate => "SPEECH CREATE",
        SpeechDeactivateGrammar => "SPEECH DEACTIVATE GRAMMAR",
        SpeechDestroy => "SPEECH DESTROY",
        SpeechLoadGrammar => "SPEECH LOAD GRAMMAR",
        SpeechRecognize => "SPEECH RECOGNIZE",
        SpeechSet => "SPEECH SET",
        SpeechUnloadGrammar => "SPEECH UNLOAD GRAMMAR",
        StreamFile => "STREAM FILE",
        TddMode => "TDD MODE",
        Verbose => "VERBOSE",
        WaitForDigit => "WAIT FOR DIGIT",
    }
}

/// Error returned when parsing an unknown command keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAgiVerbError(pub String);

impl fmt::Display for ParseAgiVerbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown AGI command: {}", self.0)
    }
}

impl std::error::Error for ParseAgiVerbError {}

/// Validate that a user-provided string contains no newline characters.
///
/// Commands are line-delimited; an embedded newline would inject a second
/// command and leave a reply unread.
fn validate_no_newlines(s: &str, context: &str) -> AgiResult<()> {
    if s.contains('\n') || s.contains('\r') {
        return Err(AgiError::InvalidArgument {
            context: context.to_string(),
        });
    }
    Ok(())
}

/// Join fragments with single spaces and terminate the line.
///
/// Empty fragments contribute nothing, not even a separator.
///
/// ```
/// use asterisk_agi_tokio::command::encode_line;
///
/// assert_eq!(encode_line(["STREAM FILE", "beep", "", "0"]), "STREAM FILE beep 0\n");
/// assert_eq!(encode_line(["ANSWER"]), "ANSWER\n");
/// ```
pub fn encode_line<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(part);
    }
    line.push_str(LINE_TERMINATOR);
    line
}

/// Prefix every space with a backslash so the engine keeps the text as one argument.
///
/// ```
/// use asterisk_agi_tokio::command::escape_spaces;
///
/// assert_eq!(escape_spaces("a b  c"), "a\\ b\\ \\ c");
/// ```
pub fn escape_spaces(s: &str) -> String {
    let spaces = s
        .bytes()
        .filter(|b| *b == b' ')
        .count();
    let mut escaped = String::with_capacity(s.len() + spaces);
    for c in s.chars() {
        if c == ' ' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A single AGI command line under construction.
///
/// Arguments are positional, so the builder tracks two rules while they are
/// appended:
///
/// - an empty [`required`](Self::required) argument rejects the command; the
///   client then answers with [`rejection`](Self::rejection) instead of
///   writing anything,
/// - once an [`optional`](Self::optional) argument is left empty, every
///   later optional argument is dropped too.
///
/// ```
/// use asterisk_agi_tokio::{AgiCommand, AgiVerb};
///
/// let cmd = AgiCommand::new(AgiVerb::ControlStreamFile)
///     .required("file", "welcome")
///     .digits("escape_digits", "")
///     .optional("skipms", "")
///     .optional("ffchar", "#");
/// assert_eq!(cmd.to_wire_format().unwrap(), "CONTROL STREAM FILE welcome \"\"\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgiCommand {
    keyword: String,
    args: Vec<(&'static str, String)>,
    missing: Option<&'static str>,
    optional_closed: bool,
    rejection: AgiResponse,
}

impl AgiCommand {
    /// Start a catalog command.
    pub fn new(verb: AgiVerb) -> Self {
        Self::custom(verb.as_str())
    }

    /// Start a command by raw keyword, for commands without an [`AgiVerb`].
    pub fn custom(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            args: Vec::new(),
            missing: None,
            optional_closed: false,
            rejection: AgiResponse::dummy("-1", ""),
        }
    }

    /// Command keyword as sent on the wire.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    fn push(mut self, name: &'static str, value: String) -> Self {
        self.args
            .push((name, value));
        self
    }

    /// Append an argument that must not be empty.
    pub fn required(mut self, name: &'static str, value: &str) -> Self {
        if value.is_empty() {
            self.missing
                .get_or_insert(name);
        }
        self.push(name, value.to_string())
    }

    /// Append a trailing argument that may be omitted.
    pub fn optional(mut self, name: &'static str, value: &str) -> Self {
        if self.optional_closed {
            return self;
        }
        if value.is_empty() {
            self.optional_closed = true;
            return self;
        }
        self.push(name, value.to_string())
    }

    /// Append an escape-digit set; an empty set is sent as `""`.
    pub fn digits(self, name: &'static str, value: &str) -> Self {
        let value = if value.is_empty() { NO_DIGITS } else { value };
        self.push(name, value.to_string())
    }

    /// Append a required argument wrapped in double quotes.
    pub fn quoted(mut self, name: &'static str, value: &str) -> Self {
        if value.is_empty() {
            self.missing
                .get_or_insert(name);
        }
        self.push(name, format!("\"{}\"", value))
    }

    /// Append an optional argument wrapped in double quotes.
    pub fn optional_quoted(self, name: &'static str, value: &str) -> Self {
        if value.is_empty() {
            return self.optional(name, value);
        }
        self.optional(name, &format!("\"{}\"", value))
    }

    /// Append an optional argument with every space backslash-escaped.
    pub fn escaped(self, name: &'static str, value: &str) -> Self {
        self.optional(name, &escape_spaces(value))
    }

    /// Append an argument, substituting `default` when `value` is empty.
    pub fn or_default(self, name: &'static str, value: &str, default: &str) -> Self {
        let value = if value.is_empty() { default } else { value };
        self.push(name, value.to_string())
    }

    /// Reply returned in place of engine output when a required argument is empty.
    pub fn on_reject(mut self, result: &str, data: &str) -> Self {
        self.rejection = AgiResponse::dummy(result, data);
        self
    }

    /// Name of the first empty required argument, if any.
    pub fn missing_argument(&self) -> Option<&'static str> {
        self.missing
    }

    /// Synthesized reply for a rejected command.
    pub fn rejection(&self) -> &AgiResponse {
        &self.rejection
    }

    /// Encode to the wire line, including the trailing newline.
    ///
    /// Returns [`AgiError::InvalidArgument`] if the keyword or any argument
    /// contains a newline.
    pub fn to_wire_format(&self) -> AgiResult<String> {
        validate_no_newlines(&self.keyword, "command keyword")?;
        for (name, value) in &self.args {
            validate_no_newlines(value, name)?;
        }
        Ok(encode_line(
            std::iter::once(self.keyword.as_str()).chain(
                self.args
                    .iter()
                    .map(|(_, v)| v.as_str()),
            ),
        ))
    }
}

impl From<AgiVerb> for AgiCommand {
    fn from(verb: AgiVerb) -> Self {
        Self::new(verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_line_skips_empty_fragments() {
        assert_eq!(encode_line(["A", "", "B", "", ""]), "A B\n");
        assert_eq!(encode_line(["", "A"]), "A\n");
        assert_eq!(encode_line(Vec::<String>::new()), "\n");
    }

    #[test]
    fn test_escape_spaces_none() {
        assert_eq!(escape_spaces("dial"), "dial");
        assert_eq!(escape_spaces(""), "");
    }

    #[test]
    fn test_escape_spaces_reversible_for_any_count() {
        for k in 0..12 {
            let original = format!("x{}y", " ".repeat(k));
            let escaped = escape_spaces(&original);
            assert_eq!(escaped.len(), original.len() + k);
            assert_eq!(
                escaped
                    .matches("\\ ")
                    .count(),
                k
            );
            assert_eq!(escaped.replace("\\ ", " "), original);
        }
    }

    #[test]
    fn test_escape_spaces_multibyte() {
        assert_eq!(escape_spaces("é à"), "é\\ à");
    }

    #[test]
    fn test_verb_wire_names() {
        assert_eq!(AgiVerb::WaitForDigit.as_str(), "WAIT FOR DIGIT");
        assert_eq!(AgiVerb::ALL.len(), 46);
        let verb: AgiVerb = "database get"
            .parse()
            .unwrap();
        assert_eq!(verb, AgiVerb::DatabaseGet);
        assert!("FLY"
            .parse::<AgiVerb>()
            .is_err());
    }

    #[test]
    fn test_simple_command_wire_format() {
        let cmd = AgiCommand::new(AgiVerb::Answer);
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "ANSWER\n"
        );
        assert!(cmd
            .missing_argument()
            .is_none());
    }

    #[test]
    fn test_required_empty_marks_missing() {
        let cmd = AgiCommand::new(AgiVerb::DatabasePut)
            .required("family", "fam")
            .required("key", "")
            .required("value", "");
        assert_eq!(cmd.missing_argument(), Some("key"));
    }

    #[test]
    fn test_optional_cascade() {
        let cmd = AgiCommand::new(AgiVerb::RecordFile)
            .required("file", "msg")
            .required("format", "wav")
            .required("escape_digits", "#")
            .required("timeout", "5000")
            .optional("offset", "")
            .optional("beep", "BEEP")
            .optional("silence", "s=3");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "RECORD FILE msg wav # 5000\n"
        );
    }

    #[test]
    fn test_optional_all_present() {
        let cmd = AgiCommand::new(AgiVerb::RecordFile)
            .required("file", "msg")
            .required("format", "wav")
            .required("escape_digits", "#")
            .required("timeout", "5000")
            .optional("offset", "0")
            .optional("beep", "BEEP")
            .optional("silence", "s=3");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "RECORD FILE msg wav # 5000 0 BEEP s=3\n"
        );
    }

    #[test]
    fn test_digits_empty_is_quoted_pair() {
        let cmd = AgiCommand::new(AgiVerb::StreamFile)
            .required("file", "beep")
            .digits("escape_digits", "");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "STREAM FILE beep \"\"\n"
        );
    }

    #[test]
    fn test_quoted_arguments() {
        let cmd = AgiCommand::new(AgiVerb::Verbose)
            .quoted("message", "hello world")
            .optional("level", "3");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "VERBOSE \"hello world\" 3\n"
        );

        let empty = AgiCommand::new(AgiVerb::SendText).quoted("text", "");
        assert_eq!(empty.missing_argument(), Some("text"));
    }

    #[test]
    fn test_optional_quoted_omitted_when_empty() {
        let cmd = AgiCommand::new(AgiVerb::Gosub)
            .required("context", "sub")
            .required("extension", "s")
            .required("priority", "1")
            .optional_quoted("arguments", "");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "GOSUB sub s 1\n"
        );
    }

    #[test]
    fn test_escaped_exec_options() {
        let cmd = AgiCommand::new(AgiVerb::Exec)
            .required("application", "Playback")
            .escaped("options", "a b");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "EXEC Playback a\\ b\n"
        );
    }

    #[test]
    fn test_or_default() {
        let cmd = AgiCommand::new(AgiVerb::GetData)
            .required("file", "prompt")
            .or_default("timeout", "", "2000")
            .optional("max_digits", "4");
        assert_eq!(
            cmd.to_wire_format()
                .unwrap(),
            "GET DATA prompt 2000 4\n"
        );
    }

    #[test]
    fn test_newline_injection_rejected() {
        let cmd = AgiCommand::new(AgiVerb::GetVariable).required("name", "FOO\nHANGUP");
        let err = cmd
            .to_wire_format()
            .unwrap_err();
        assert!(matches!(err, AgiError::InvalidArgument { ref context } if context == "name"));

        let custom = AgiCommand::custom("NOOP\r");
        assert!(custom
            .to_wire_format()
            .is_err());
    }

    #[test]
    fn test_rejection_defaults_and_override() {
        let cmd = AgiCommand::new(AgiVerb::Exec);
        assert_eq!(
            cmd.rejection()
                .result(),
            "-1"
        );
        let cmd = cmd.on_reject("-2", "");
        assert_eq!(
            cmd.rejection()
                .result(),
            "-2"
        );
        assert_eq!(
            cmd.rejection()
                .status_code(),
            "200"
        );
    }
}
