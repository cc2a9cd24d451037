//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use armature_protocol::Command;

/// Maximum length of one reply line (without line ending)
pub const REPLY_LEN: usize = 64;

/// One line of console output
pub type Reply = heapless::String<REPLY_LEN>;

/// Channel capacity for parsed console commands
///
/// Small on purpose: while the arm is moving the console task blocks on a
/// full channel and further bytes wait in the UART ring buffer.
const COMMAND_CHANNEL_SIZE: usize = 2;

/// Channel capacity for reply lines
const REPLY_CHANNEL_SIZE: usize = 16;

/// Commands from the console for the arm task
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Reply lines for the console TX task
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, Reply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Queue a reply line, dropping it if the console is backed up
pub fn reply(line: Reply) {
    if REPLY_CHANNEL.try_send(line).is_err() {
        defmt::warn!("Reply channel full, dropping line");
    }
}

/// Queue a reply from a static string
pub fn reply_str(text: &str) {
    let mut line = Reply::new();
    // Truncation is acceptable for console output
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    reply(line);
}
