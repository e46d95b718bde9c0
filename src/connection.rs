//! Client side of an AGI session

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::{debug, info, trace, warn};

use crate::{
    command::AgiCommand,
    constants::{DEFAULT_TIMEOUT_MS, MAX_ARGS},
    error::{AgiError, AgiResult},
    response::AgiResponse,
    session::SessionContext,
};

/// Options for an AGI session.
///
/// Use [`Default::default()`] for the engine's usual settings.
#[derive(Debug, Clone)]
pub struct AgiOptions {
    /// Timeout in milliseconds sent when a caller leaves a timeout empty. Default: 2000.
    pub default_timeout_ms: String,
    /// Maximum number of script arguments accepted at startup. Default: 127.
    pub max_args: usize,
}

impl Default for AgiOptions {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS.to_string(),
            max_args: MAX_ARGS,
        }
    }
}

/// AGI client bound to the engine's command stream.
///
/// The engine answers every command with exactly one line and never sends
/// anything unprompted, so the client holds no background task: each method
/// writes one line, flushes, and reads one line back. Methods take
/// `&mut self`, which keeps a second command from being issued while a
/// reply is outstanding.
///
/// ```rust,no_run
/// use asterisk_agi_tokio::{AgiClient, AgiError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), AgiError> {
///     let (mut agi, session) = AgiClient::stdio().await?;
///     agi.answer().await?;
///     agi.say_digits(&session.extension, "#").await?;
///     agi.hangup("").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct AgiClient<R, W> {
    reader: R,
    writer: W,
    options: AgiOptions,
    line: Vec<u8>,
}

impl AgiClient<BufReader<Stdin>, Stdout> {
    /// Read the startup block from stdin and bind the client to stdin/stdout.
    pub async fn stdio() -> AgiResult<(Self, SessionContext)> {
        Self::stdio_with_options(AgiOptions::default()).await
    }

    /// Like [`stdio`](Self::stdio) with explicit options.
    pub async fn stdio_with_options(options: AgiOptions) -> AgiResult<(Self, SessionContext)> {
        Self::start_with_options(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            options,
        )
        .await
    }
}

impl<R, W> AgiClient<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Read the startup block from `reader` and return a client ready for commands.
    pub async fn start(reader: R, writer: W) -> AgiResult<(Self, SessionContext)> {
        Self::start_with_options(reader, writer, AgiOptions::default()).await
    }

    /// Like [`start`](Self::start) with explicit options.
    pub async fn start_with_options(
        mut reader: R,
        writer: W,
        options: AgiOptions,
    ) -> AgiResult<(Self, SessionContext)> {
        let session = SessionContext::read_from(&mut reader, options.max_args).await?;
        info!(
            "[STARTUP] {} on {} ({} args)",
            session
                .request
                .trim(),
            session
                .channel
                .trim(),
            session
                .args
                .len()
        );
        Ok((Self::new(reader, writer, options), session))
    }

    /// Wrap a transport whose startup block has already been consumed.
    pub fn new(reader: R, writer: W, options: AgiOptions) -> Self {
        Self {
            reader,
            writer,
            options,
            line: Vec::new(),
        }
    }

    /// Session options.
    pub fn options(&self) -> &AgiOptions {
        &self.options
    }

    pub(crate) fn default_timeout(&self) -> &str {
        &self
            .options
            .default_timeout_ms
    }

    /// Send a command and wait for its reply line.
    ///
    /// A command with an empty required argument is not sent; its
    /// [`rejection`](AgiCommand::rejection) reply is returned instead, so
    /// callers see the same shape of result either way.
    pub async fn send_command(&mut self, command: AgiCommand) -> AgiResult<AgiResponse> {
        if let Some(argument) = command.missing_argument() {
            warn!(
                "[REJECT] {} not sent: <{}> must not be empty",
                command.keyword(),
                argument
            );
            return Ok(command
                .rejection()
                .clone());
        }

        let wire = command.to_wire_format()?;
        debug!("[SEND] {}", wire.trim_end());

        self.writer
            .write_all(wire.as_bytes())
            .await?;
        self.writer
            .flush()
            .await?;

        self.read_reply().await
    }

    /// Read and decode exactly one reply line.
    ///
    /// Variable values are passed through in whatever charset the channel
    /// uses; bytes that are not valid UTF-8 become U+FFFD.
    async fn read_reply(&mut self) -> AgiResult<AgiResponse> {
        self.line
            .clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.line)
            .await?;
        if n == 0 {
            warn!("[RECV] stream closed while waiting for a reply");
            return Err(AgiError::ConnectionClosed);
        }
        let line = String::from_utf8_lossy(&self.line);
        trace!("[RECV] {:?}", line);

        let response = AgiResponse::parse(&line)?;
        debug!("[RECV] {}", response);
        Ok(response)
    }

    /// Release the transport halves.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
