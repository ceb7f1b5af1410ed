//! Bounded command mailbox between the network layer and the control loop.
//!
//! ```text
//! ┌────────────────┐  RemoteCommand  ┌──────────────┐
//! │ Dashboard link │───────────────▶│ Control loop │
//! │ (any context)  │   depth 8       │ (drains once │
//! └────────────────┘                 │  per cycle)  │
//!                                    └──────────────┘
//! ```
//!
//! Built on an `embassy-sync` channel so the producer may live on another
//! task or thread.  A full mailbox drops the newest command.  The consumer
//! takes everything queued in one go, so commands posted while a batch is
//! being applied wait for the next cycle.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::warn;

use super::commands::RemoteCommand;

/// Maximum number of commands buffered between two cycles.
pub const MAILBOX_DEPTH: usize = 8;

pub struct CommandMailbox {
    channel: Channel<CriticalSectionRawMutex, RemoteCommand, MAILBOX_DEPTH>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a command.  Returns `false` (and logs) when the mailbox is full.
    pub fn post(&self, cmd: RemoteCommand) -> bool {
        if self.channel.try_send(cmd).is_err() {
            warn!("Mailbox full, dropping {:?}", cmd);
            return false;
        }
        true
    }

    /// Take every queued command, oldest first.
    pub fn take(&self) -> Vec<RemoteCommand, MAILBOX_DEPTH> {
        let mut pending = Vec::new();
        while !pending.is_full() {
            match self.channel.try_receive() {
                Ok(cmd) => {
                    // Cannot fail: capacity checked above.
                    let _ = pending.push(cmd);
                }
                Err(_) => break,
            }
        }
        pending
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}
