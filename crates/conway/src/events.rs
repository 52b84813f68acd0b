//! # Input Events
//!
//! Keyboard and terminal-size events travel from the input thread to the
//! session over a bounded channel.
//!
//! ```text
//! ┌──────────────┐  InputEvent   ┌─────────┐  dispatch   ┌──────────────┐
//! │ stdin thread │──────────────>│ channel │────────────>│   Session    │
//! └──────────────┘   (bounded)   └─────────┘             │ key / resize │
//!                                                        │   handlers   │
//!                                                        └──────────────┘
//! ```

use std::time::Duration;

use conway_core::Key;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

/// Default number of events in flight before senders block.
pub const DEFAULT_INPUT_CAPACITY: usize = 64;

/// Something the user did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(Key),
    /// The display area changed size.
    Resize {
        /// New width in cells.
        width: usize,
        /// New height in cells.
        height: usize,
    },
    /// The input source closed or the user asked to leave.
    Quit,
}

impl InputEvent {
    /// Turns one line of line-buffered terminal input into events.
    ///
    /// `:resize W H` and `:quit` are commands; any other line is a sequence
    /// of key presses, one per character. An empty line is a single
    /// [`Key::Enter`].
    #[must_use]
    pub fn parse_line(line: &str) -> Vec<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return vec![Self::Key(Key::Enter)];
        }

        if let Some(command) = line.strip_prefix(':') {
            let mut words = command.split_whitespace();
            match words.next() {
                Some("quit" | "q") => return vec![Self::Quit],
                Some("resize") => {
                    let width = words.next().and_then(|w| w.parse().ok());
                    let height = words.next().and_then(|h| h.parse().ok());
                    if let (Some(width), Some(height)) = (width, height) {
                        return vec![Self::Resize { width, height }];
                    }
                    tracing::warn!("Ignoring malformed resize command {:?}", line);
                    return Vec::new();
                }
                _ => {}
            }
        }

        line.chars()
            .map(|c| match c {
                '\x1b' => Self::Key(Key::Escape),
                c => Self::Key(Key::Char(c)),
            })
            .collect()
    }
}

/// Bounded queue of input events.
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    /// Creates a queue holding at most `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> InputReceiver {
        InputReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a sender/receiver pair.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (InputSender, InputReceiver) {
        let queue = Self::new(capacity);
        (queue.sender(), queue.receiver())
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_CAPACITY)
    }
}

/// Handle for sending input events.
#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the queue is full or the receiver is gone.
    #[inline]
    pub fn send(&self, event: InputEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("Input queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Sends an event, waiting for room in the queue.
    ///
    /// Returns `false` if the receiver is gone.
    #[inline]
    pub fn send_blocking(&self, event: InputEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Handle for receiving input events.
#[derive(Clone)]
pub struct InputReceiver {
    receiver: Receiver<InputEvent>,
}

/// Outcome of waiting for the next event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Received {
    /// An event arrived.
    Event(InputEvent),
    /// Nothing arrived in time.
    Timeout,
    /// Every sender is gone.
    Disconnected,
}

impl InputReceiver {
    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Received {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Received::Event(event),
            Err(RecvTimeoutError::Timeout) => Received::Timeout,
            Err(RecvTimeoutError::Disconnected) => Received::Disconnected,
        }
    }

    /// Receives one event without blocking.
    #[inline]
    pub fn try_recv(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receives all pending events without blocking.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
