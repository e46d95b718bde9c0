//! Minimal AGI script: logs the session, answers, announces itself on the
//! engine console and reads back the caller's number.
//!
//! ```text
//! exten => 100,1,AGI(agi-echo)
//! ```

use asterisk_agi_tokio::{diagnostics, AgiClient, AgiResult, DigitOutcome};
use tracing::{info, warn};

async fn run() -> AgiResult<()> {
    let (mut agi, session) = AgiClient::stdio().await?;
    match serde_json::to_string(&session) {
        Ok(json) => info!("[STARTUP] session {}", json),
        Err(e) => warn!("[STARTUP] session not serializable: {}", e),
    }

    agi.answer().await?;
    agi.verbose(
        &format!("agi-echo on {}", session.channel.trim()),
        "1",
    )
    .await?;

    let caller = session
        .caller_id
        .trim();
    if !caller.is_empty() && caller != "unknown" {
        if let DigitOutcome::Pressed(key) = agi.say_digits(caller, "#").await? {
            info!("caller interrupted playback with {}", key);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    diagnostics::init_logging();
    diagnostics::exit_on_error(run().await);
}
