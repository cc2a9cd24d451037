//! Console UART receive task
//!
//! Assembles lines from the UART and turns them into arm commands.

use core::fmt::Write;

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use armature_protocol::{Command, CommandError, LineParser};

use crate::channels::{reply, reply_str, Reply, COMMAND_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Console RX task - receives command lines from the host
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => handle_line(&line).await,
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Line error: {:?}", e);
                            reply_str("err line");
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Parse one line and hand the command to the arm task
async fn handle_line(line: &str) {
    match Command::parse(line) {
        Ok(Some(command)) => {
            debug!("Command: {:?}", command);
            // Waits while the arm is busy with a previous command
            COMMAND_CHANNEL.send(command).await;
        }
        Ok(None) => {}
        Err(CommandError::Signal(e)) => {
            warn!("Bad signal: {:?}", e);
            let mut text = Reply::new();
            let _ = write!(text, "err signal {:?}", e);
            reply(text);
        }
        Err(CommandError::Unknown) => {
            warn!("Unknown command");
            reply_str("err unknown command, try help");
        }
    }
}
