//! Asterisk Gateway Interface (AGI) client for Rust
//!
//! The engine starts an AGI script once per call, writes a block of call
//! metadata to the script's stdin, then accepts one command per line on
//! stdout and answers each with a single reply line on stdin. This crate
//! reads the metadata into a [`SessionContext`], encodes commands, decodes
//! replies into [`AgiResponse`], and wraps every command in a typed method
//! on [`AgiClient`].
//!
//! # Examples
//!
//! ## Script over stdin/stdout
//!
//! ```rust,no_run
//! use asterisk_agi_tokio::{diagnostics, AgiClient, AgiResult, DigitOutcome};
//!
//! async fn run() -> AgiResult<()> {
//!     let (mut agi, session) = AgiClient::stdio().await?;
//!     agi.answer().await?;
//!
//!     let greeting = agi.stream_file("welcome", "#", "").await?;
//!     if greeting.digit().is_none() {
//!         if let DigitOutcome::Pressed(key) = agi.wait_for_digit("5000").await? {
//!             agi.set_variable("MENU_CHOICE", &key.to_string()).await?;
//!         }
//!     }
//!
//!     let lang = agi.get_variable("CHANNEL(language)").await?;
//!     agi.verbose(&format!("{} speaks {}", session.channel.trim(), lang), "3").await?;
//!     agi.hangup("").await?;
//!     Ok(())
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     diagnostics::init_logging();
//!     diagnostics::exit_on_error(run().await);
//! }
//! ```
//!
//! ## Local rejection
//!
//! A required argument left empty is never sent. The method returns the
//! same sentinel a failing engine would, without touching the stream:
//!
//! ```rust
//! use asterisk_agi_tokio::{AgiClient, AgiOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut agi = AgiClient::new(&b""[..], Vec::new(), AgiOptions::default());
//! assert_eq!(agi.get_variable("").await.unwrap(), "");
//! assert_eq!(agi.database_put("fam", "", "v").await.unwrap(), 0);
//! let (_, written) = agi.into_parts();
//! assert!(written.is_empty());
//! # }
//! ```
//!
//! ## Raw commands
//!
//! Commands without a wrapper go through [`AgiClient::send_command`] with
//! the same encoding rules:
//!
//! ```rust
//! use asterisk_agi_tokio::AgiCommand;
//!
//! let cmd = AgiCommand::custom("ASYNCAGI BREAK");
//! assert_eq!(cmd.to_wire_format().unwrap(), "ASYNCAGI BREAK\n");
//! ```

#[macro_use]
mod macros;

pub mod catalog;
pub mod command;
pub mod connection;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod response;
pub mod session;
pub mod status;

pub use command::{AgiCommand, AgiVerb, ParseAgiVerbError};
pub use connection::{AgiClient, AgiOptions};
pub use error::{AgiError, AgiResult};
pub use response::{AgiResponse, ParseReplyAnnotationError, ReplyAnnotation};
pub use session::{ParseSessionFieldError, SessionContext, SessionField};
pub use status::{ChannelStatus, DigitOutcome};
