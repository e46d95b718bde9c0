//! Typed wrappers for every AGI command.
//!
//! Arguments are plain strings; an empty string means "not given". A required
//! argument left empty short-circuits to a locally synthesized reply and
//! nothing is written, so the return value of a rejected call is the same
//! sentinel a failing engine would produce. Optional arguments are positional:
//! leaving one empty also drops every optional argument after it.
//!
//! Engine behaviors worth knowing about:
//!
//! - key presses come back as the decimal ASCII code of the digit
//!   (`49` for `1`); [`DigitOutcome`] decodes them,
//! - `RECEIVE CHAR` is unreliable on most channel drivers,
//! - `DATABASE DELTREE` without a keytree reports success regardless of
//!   whether anything was deleted.

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::{
    command::{AgiCommand, AgiVerb},
    connection::AgiClient,
    error::AgiResult,
    response::AgiResponse,
    status::{ChannelStatus, DigitOutcome},
};

/// `1` when the result token is exactly `"1"`, else `0`.
fn one_or_zero(response: &AgiResponse) -> i32 {
    i32::from(response.result() == "1")
}

/// `0` when the result token is exactly `"0"`, else `-1`.
fn zero_or_failed(response: &AgiResponse) -> i32 {
    if response.result() == "0" {
        0
    } else {
        -1
    }
}

impl<R, W> AgiClient<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn constant(&mut self, command: AgiCommand, value: i32) -> AgiResult<i32> {
        self.send_command(command).await?;
        Ok(value)
    }

    async fn result_code(&mut self, command: AgiCommand) -> AgiResult<i32> {
        Ok(self
            .send_command(command)
            .await?
            .result_code())
    }

    async fn digit_outcome(&mut self, command: AgiCommand) -> AgiResult<DigitOutcome> {
        let response = self
            .send_command(command)
            .await?;
        Ok(DigitOutcome::from_response(&response))
    }

    async fn value(&mut self, command: AgiCommand) -> AgiResult<String> {
        Ok(self
            .send_command(command)
            .await?
            .value()
            .to_string())
    }

    /// Answer the channel. `0` on success, `-1` on failure.
    pub async fn answer(&mut self) -> AgiResult<i32> {
        let response = self
            .send_command(AgiCommand::new(AgiVerb::Answer))
            .await?;
        Ok(if response.result() == "-1" { -1 } else { 0 })
    }

    /// Status of `channel`, or of the current channel when empty.
    pub async fn channel_status(&mut self, channel: &str) -> AgiResult<ChannelStatus> {
        let cmd = AgiCommand::new(AgiVerb::ChannelStatus).optional("channel", channel);
        let response = self
            .send_command(cmd)
            .await?;
        Ok(ChannelStatus::from_result(response.result()))
    }

    /// Delete `family/key` from the database. `1` on success, `0` otherwise.
    pub async fn database_del(&mut self, family: &str, key: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::DatabaseDel)
            .required("family", family)
            .required("key", key)
            .on_reject("0", "");
        let response = self
            .send_command(cmd)
            .await?;
        Ok(one_or_zero(&response))
    }

    /// Delete a family, or a keytree within it. `1` on success, `0` otherwise.
    ///
    /// Without a keytree the engine reports success even for a family that
    /// does not exist.
    pub async fn database_deltree(&mut self, family: &str, keytree: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::DatabaseDeltree)
            .required("family", family)
            .optional("keytree", keytree)
            .on_reject("0", "");
        let response = self
            .send_command(cmd)
            .await?;
        Ok(one_or_zero(&response))
    }

    /// Value stored at `family/key`, or `""` if absent.
    pub async fn database_get(&mut self, family: &str, key: &str) -> AgiResult<String> {
        let cmd = AgiCommand::new(AgiVerb::DatabaseGet)
            .required("family", family)
            .required("key", key)
            .on_reject("0", "");
        self.value(cmd).await
    }

    /// Store `value` at `family/key`. `1` on success, `0` otherwise.
    pub async fn database_put(&mut self, family: &str, key: &str, value: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::DatabasePut)
            .required("family", family)
            .required("key", key)
            .required("value", value)
            .on_reject("0", "");
        let response = self
            .send_command(cmd)
            .await?;
        Ok(one_or_zero(&response))
    }

    /// Run a dialplan application. Spaces in `options` are escaped so the
    /// engine receives them as a single argument.
    ///
    /// The result token is the application's return value, `-2` if the
    /// application was not found (or `application` was empty).
    pub async fn exec(&mut self, application: &str, options: &str) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::Exec)
            .required("application", application)
            .escaped("options", options)
            .on_reject("-2", "");
        self.send_command(cmd).await
    }

    /// Play `file` and collect DTMF digits. The digits are in the result token,
    /// with `(timeout)` in the data when input timed out.
    pub async fn get_data(
        &mut self,
        file: &str,
        timeout: &str,
        max_digits: &str,
    ) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::GetData)
            .required("file", file)
            .or_default("timeout", timeout, self.default_timeout())
            .optional("max_digits", max_digits)
            .on_reject("-1", "");
        self.send_command(cmd).await
    }

    /// Evaluate `expression` (variables and functions), optionally on another channel.
    pub async fn get_full_variable(&mut self, expression: &str, channel: &str) -> AgiResult<String> {
        let cmd = AgiCommand::new(AgiVerb::GetFullVariable)
            .required("expression", expression)
            .optional("channel", channel)
            .on_reject("0", "");
        self.value(cmd).await
    }

    /// Like [`stream_file`](Self::stream_file) but waits `timeout` for a digit
    /// after playback. Escape digits are required.
    pub async fn get_option(
        &mut self,
        file: &str,
        escape_digits: &str,
        timeout: &str,
    ) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::GetOption)
            .required("file", file)
            .required("escape_digits", escape_digits)
            .optional("timeout", timeout)
            .on_reject("-1", "endpos=0");
        self.send_command(cmd).await
    }

    /// Value of a channel variable, or `""` if unset.
    pub async fn get_variable(&mut self, name: &str) -> AgiResult<String> {
        let cmd = AgiCommand::new(AgiVerb::GetVariable)
            .required("name", name)
            .on_reject("0", "");
        self.value(cmd).await
    }

    /// Hang up `channel`, or the current channel when empty. `1` on success, `-1` otherwise.
    pub async fn hangup(&mut self, channel: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::Hangup).optional("channel", channel);
        let response = self
            .send_command(cmd)
            .await?;
        Ok(if response.result() == "1" { 1 } else { -1 })
    }

    /// Do nothing, optionally logging `text` on the engine side. Always `0`.
    pub async fn noop(&mut self, text: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::Noop).optional("text", text);
        self.constant(cmd, 0).await
    }

    /// Wait up to `timeout` ms for a single character of text.
    ///
    /// Most channel drivers do not implement text reception; treat the result
    /// as advisory.
    pub async fn receive_char(&mut self, timeout: &str) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::ReceiveChar).or_default("timeout", timeout, self.default_timeout());
        self.send_command(cmd).await
    }

    /// Wait up to `timeout` ms for a string of text. Empty on failure.
    ///
    /// A timeout of `0` returns immediately on current engines.
    pub async fn receive_text(&mut self, timeout: &str) -> AgiResult<String> {
        let cmd = AgiCommand::new(AgiVerb::ReceiveText).or_default("timeout", timeout, self.default_timeout());
        let response = self
            .send_command(cmd)
            .await?;
        if response.result() == "-1" {
            return Ok(String::new());
        }
        Ok(response
            .result()
            .to_string())
    }

    /// Record audio to `file` until an escape digit, `timeout`, or silence.
    ///
    /// `offset`, `beep` (any non-empty value) and `silence` (`s=<seconds>`)
    /// are positional; leaving one empty drops the ones after it.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_file(
        &mut self,
        file: &str,
        format: &str,
        escape_digits: &str,
        timeout: &str,
        offset: &str,
        beep: &str,
        silence: &str,
    ) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::RecordFile)
            .required("file", file)
            .required("format", format)
            .required("escape_digits", escape_digits)
            .required("timeout", timeout)
            .optional("offset", offset)
            .optional("beep", beep)
            .optional("silence", silence)
            .on_reject("-1", "(randomerror) endpos=0");
        self.send_command(cmd).await
    }

    /// Spell out `text` character by character.
    pub async fn say_alpha(&mut self, text: &str, escape_digits: &str) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayAlpha)
            .required("text", text)
            .required("escape_digits", escape_digits);
        self.digit_outcome(cmd).await
    }

    /// Say a date given as seconds since the Unix epoch.
    pub async fn say_date(&mut self, date: &str, escape_digits: &str) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayDate)
            .required("date", date)
            .required("escape_digits", escape_digits);
        self.digit_outcome(cmd).await
    }

    /// Say a date and time given as seconds since the Unix epoch.
    ///
    /// `timezone` is only sent when `format` is given.
    pub async fn say_datetime(
        &mut self,
        time: &str,
        escape_digits: &str,
        format: &str,
        timezone: &str,
    ) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayDatetime)
            .required("time", time)
            .required("escape_digits", escape_digits)
            .optional("format", format)
            .optional("timezone", timezone);
        self.digit_outcome(cmd).await
    }

    /// Say a string of digits one at a time.
    pub async fn say_digits(&mut self, digits: &str, escape_digits: &str) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayDigits)
            .required("digits", digits)
            .required("escape_digits", escape_digits);
        self.digit_outcome(cmd).await
    }

    /// Say a whole number, with an optional grammatical gender.
    pub async fn say_number(
        &mut self,
        number: &str,
        escape_digits: &str,
        gender: &str,
    ) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayNumber)
            .required("number", number)
            .required("escape_digits", escape_digits)
            .optional("gender", gender);
        self.digit_outcome(cmd).await
    }

    /// Spell out `text` using the phonetic alphabet.
    pub async fn say_phonetic(&mut self, text: &str, escape_digits: &str) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayPhonetic)
            .required("text", text)
            .required("escape_digits", escape_digits);
        self.digit_outcome(cmd).await
    }

    /// Say a time of day given as seconds since the Unix epoch.
    pub async fn say_time(&mut self, time: &str, escape_digits: &str) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::SayTime)
            .required("time", time)
            .required("escape_digits", escape_digits);
        self.digit_outcome(cmd).await
    }

    /// Send an image on channels that support it. `0` on success, `-1` otherwise.
    pub async fn send_image(&mut self, image: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SendImage).required("image", image);
        let response = self
            .send_command(cmd)
            .await?;
        Ok(zero_or_failed(&response))
    }

    /// Send text on channels that support it. `0` on success, `-1` otherwise.
    pub async fn send_text(&mut self, text: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SendText).quoted("text", text);
        let response = self
            .send_command(cmd)
            .await?;
        Ok(zero_or_failed(&response))
    }

    /// Hang up automatically after `seconds`; `0` disables. Always `0`.
    pub async fn set_autohangup(&mut self, seconds: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetAutohangup).required("seconds", seconds);
        self.constant(cmd, 0).await
    }

    /// Change the caller ID of the current channel. Always `1`.
    pub async fn set_callerid(&mut self, number: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetCallerid).required("number", number);
        self.constant(cmd, 1).await
    }

    /// Set the dialplan context to continue in on exit. Always `0`.
    pub async fn set_context(&mut self, context: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetContext).required("context", context);
        self.constant(cmd, 0).await
    }

    /// Set the extension to continue at on exit. Always `0`.
    pub async fn set_extension(&mut self, extension: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetExtension).required("extension", extension);
        self.constant(cmd, 0).await
    }

    /// Turn music on hold `on` or `off`, optionally with a class. Always `0`.
    pub async fn set_music(&mut self, on_off: &str, class: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetMusic)
            .required("on_off", on_off)
            .optional("class", class);
        self.constant(cmd, 0).await
    }

    /// Set the priority (number or label) to continue at on exit. Always `0`.
    pub async fn set_priority(&mut self, priority: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetPriority).required("priority", priority);
        self.constant(cmd, 0).await
    }

    /// Set a channel variable. Always `1`.
    pub async fn set_variable(&mut self, name: &str, value: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SetVariable)
            .required("name", name)
            .required("value", value);
        self.constant(cmd, 1).await
    }

    /// Play `file`, stopping early if one of `escape_digits` is pressed.
    ///
    /// An empty digit set is sent as `""` (no digit interrupts playback).
    /// `sample_offset` starts playback part way into the file.
    pub async fn stream_file(
        &mut self,
        file: &str,
        escape_digits: &str,
        sample_offset: &str,
    ) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::StreamFile)
            .required("file", file)
            .digits("escape_digits", escape_digits)
            .optional("sample_offset", sample_offset)
            .on_reject("0", "endpos=0");
        self.send_command(cmd).await
    }

    /// Play `file` with fast-forward, rewind and pause keys.
    pub async fn control_stream_file(
        &mut self,
        file: &str,
        escape_digits: &str,
        skip_ms: &str,
        ff_char: &str,
        rew_char: &str,
        pause_char: &str,
    ) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::ControlStreamFile)
            .required("file", file)
            .digits("escape_digits", escape_digits)
            .optional("skip_ms", skip_ms)
            .optional("ff_char", ff_char)
            .optional("rew_char", rew_char)
            .optional("pause_char", pause_char)
            .on_reject("0", "endpos=0");
        self.send_command(cmd).await
    }

    /// Switch TDD mode (`on`, `off` or `mate`). `1` on success, `0` if the
    /// channel is not TDD capable, `-1` on failure.
    pub async fn tdd_mode(&mut self, mode: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::TddMode).required("mode", mode);
        let response = self
            .send_command(cmd)
            .await?;
        Ok(match response.result() {
            "1" => 1,
            "0" => 0,
            _ => -1,
        })
    }

    /// Log `message` to the engine console at an optional verbosity level. Always `1`.
    pub async fn verbose(&mut self, message: &str, level: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::Verbose)
            .quoted("message", message)
            .optional("level", level);
        self.constant(cmd, 1).await
    }

    /// Wait up to `timeout` ms (`-1` for ever) for a keypress.
    pub async fn wait_for_digit(&mut self, timeout: &str) -> AgiResult<DigitOutcome> {
        let cmd = AgiCommand::new(AgiVerb::WaitForDigit).required("timeout", timeout);
        self.digit_outcome(cmd).await
    }

    /// Create a speech object for `engine`.
    pub async fn speech_create(&mut self, engine: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SpeechCreate).required("engine", engine);
        self.result_code(cmd).await
    }

    /// Set an engine-specific speech setting.
    pub async fn speech_set(&mut self, name: &str, value: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SpeechSet)
            .required("name", name)
            .required("value", value);
        self.result_code(cmd).await
    }

    /// Destroy the speech object.
    pub async fn speech_destroy(&mut self) -> AgiResult<i32> {
        self.result_code(AgiCommand::new(AgiVerb::SpeechDestroy))
            .await
    }

    /// Load grammar `name` from `path`.
    pub async fn speech_load_grammar(&mut self, name: &str, path: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SpeechLoadGrammar)
            .required("name", name)
            .required("path", path);
        self.result_code(cmd).await
    }

    /// Unload grammar `name`.
    pub async fn speech_unload_grammar(&mut self, name: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SpeechUnloadGrammar).required("name", name);
        self.result_code(cmd).await
    }

    /// Activate grammar `name`.
    pub async fn speech_activate_grammar(&mut self, name: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SpeechActivateGrammar).required("name", name);
        self.result_code(cmd).await
    }

    /// Deactivate grammar `name`.
    pub async fn speech_deactivate_grammar(&mut self, name: &str) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::SpeechDeactivateGrammar).required("name", name);
        self.result_code(cmd).await
    }

    /// Play `prompt` and run recognition. The recognition result is in `data`.
    pub async fn speech_recognize(
        &mut self,
        prompt: &str,
        timeout: &str,
        offset: &str,
    ) -> AgiResult<AgiResponse> {
        let cmd = AgiCommand::new(AgiVerb::SpeechRecognize)
            .required("prompt", prompt)
            .or_default("timeout", timeout, self.default_timeout())
            .optional("offset", offset)
            .on_reject("-1", "");
        self.send_command(cmd).await
    }

    /// Call a dialplan subroutine; `arguments` is sent as one quoted,
    /// comma-separated argument list.
    pub async fn gosub(
        &mut self,
        context: &str,
        extension: &str,
        priority: &str,
        arguments: &str,
    ) -> AgiResult<i32> {
        let cmd = AgiCommand::new(AgiVerb::Gosub)
            .required("context", context)
            .required("extension", extension)
            .required("priority", priority)
            .optional_quoted("arguments", arguments);
        self.result_code(cmd).await
    }
}
