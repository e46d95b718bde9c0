//! Protocol constants and configuration values

/// Number of positional session fields sent before the script arguments.
pub const SESSION_FIELD_COUNT: usize = 20;

/// Maximum number of script arguments accepted in the startup block.
///
/// The engine folds any overflow into the last slot, so more lines than this
/// means the stream is not a well-formed startup block.
pub const MAX_ARGS: usize = 127;

/// Placeholder stored for session fields the engine sent empty or not at all.
pub const EMPTY_FIELD: &str = " ";

/// Timeout substituted when a caller leaves a timeout argument empty.
pub const DEFAULT_TIMEOUT_MS: &str = "2000";

/// Status code of a normally completed command.
pub const STATUS_OK: &str = "200";

/// Every command and reply is a single line ending in this terminator.
pub const LINE_TERMINATOR: &str = "\n";

/// Literal sent in place of an empty escape-digit set.
pub const NO_DIGITS: &str = "\"\"";

/// Environment variable holding the log filter for [`init_logging`](crate::diagnostics::init_logging).
pub const LOG_ENV_VAR: &str = "AGI_LOG";

/// Filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";
