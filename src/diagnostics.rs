//! Logging setup and the top-level fatal error handler.
//!
//! stdout carries the command stream, so every diagnostic goes to stderr.

use std::io::{self, Write};

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{
    constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR},
    error::{AgiError, AgiResult},
};

/// Install a `tracing` subscriber writing to stderr.
///
/// The filter is read from `AGI_LOG` (same syntax as `RUST_LOG`) and
/// defaults to `warn`. Calling this more than once is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Write a one-line diagnostic for `err` to `sink` and flush it.
pub fn report_fatal<W: Write>(sink: &mut W, err: &AgiError) -> io::Result<()> {
    writeln!(sink, "agi: fatal: {}", err)?;
    sink.flush()
}

/// Unwrap `result`, or report the error on stderr and exit with status 1.
///
/// Meant for the outermost layer of a script, where every [`AgiError`] ends
/// the session.
pub fn exit_on_error<T>(result: AgiResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!("session aborted: {}", err);
            let _ = report_fatal(&mut io::stderr().lock(), &err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_fatal_writes_single_line() {
        let mut sink = Vec::new();
        let err = AgiError::startup_format("line 3 has no ':' separator");
        report_fatal(&mut sink, &err).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("agi: fatal: malformed startup block"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_exit_on_error_passes_ok_through() {
        assert_eq!(exit_on_error(Ok::<_, AgiError>(7)), 7);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
