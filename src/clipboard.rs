//! System clipboard output.

use std::time::Duration;

use arboard::Clipboard;
use tracing::debug;

/// Copies `text` to the clipboard.
///
/// On Linux the selection lives only as long as its owner, so this blocks
/// until another application takes the clipboard or `hold` elapses.
pub fn copy(text: &str, hold: Duration) -> Result<(), arboard::Error> {
    let mut clipboard = Clipboard::new()?;
    set_text(&mut clipboard, text, hold)?;
    debug!("password copied to clipboard");
    Ok(())
}

#[cfg(target_os = "linux")]
fn set_text(clipboard: &mut Clipboard, text: &str, hold: Duration) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    debug!(?hold, "holding clipboard ownership");
    clipboard
        .set()
        .wait_until(Instant::now() + hold)
        .text(text.to_owned())
}

#[cfg(not(target_os = "linux"))]
fn set_text(clipboard: &mut Clipboard, text: &str, _hold: Duration) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_owned())
}

// end of source
