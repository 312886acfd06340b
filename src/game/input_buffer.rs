//! Lock-free input buffer between the input source and the session loop
//!
//! Uses crossbeam-channel so a keyboard reader, a replay script or a test
//! harness can submit control frames and commands without touching the
//! simulator directly. The session drains everything once per frame.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::game::input::ControlSnapshot;
use crate::game::state::CombatantId;

/// Session-level commands that bypass the per-tick control flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Leave the menu and start round one
    StartSession,
    /// Reset the current round in place
    RestartRound,
}

/// Message from an input source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMessage {
    /// Latest held controls for both players
    Controls(ControlSnapshot),
    /// Raw stick position for one player, validated by the session
    Axes {
        combatant: CombatantId,
        x: f32,
        z: f32,
        attack: bool,
    },
    Command(SessionCommand),
}

/// Input buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputBufferError {
    /// Buffer is full (backpressure)
    #[error("input buffer full")]
    Full,
    /// Session loop stopped
    #[error("input buffer disconnected")]
    Disconnected,
}

/// Bounded input queue drained by the session loop
pub struct InputBuffer {
    sender: Sender<InputMessage>,
    receiver: Receiver<InputMessage>,
    capacity: usize,
}

impl InputBuffer {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a sender handle for an input source
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Try to submit a message (non-blocking)
    ///
    /// Returns true if successful, false if buffer is full
    #[inline]
    pub fn try_submit(&self, message: InputMessage) -> bool {
        self.sender.try_send(message).is_ok()
    }

    /// Drain every pending message, oldest first
    pub fn drain(&self) -> Vec<InputMessage> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        // One frame per tick plus commands, with a few seconds of slack
        Self::new(256)
    }
}

/// Clonable sender handle
#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputMessage>,
}

impl InputSender {
    #[inline]
    pub fn try_send(&self, message: InputMessage) -> Result<(), InputBufferError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => InputBufferError::Full,
            TrySendError::Disconnected(_) => InputBufferError::Disconnected,
        })
    }

    pub fn send_controls(&self, controls: ControlSnapshot) -> Result<(), InputBufferError> {
        self.try_send(InputMessage::Controls(controls))
    }

    pub fn send_axes(&self, combatant: CombatantId, x: f32, z: f32, attack: bool) -> Result<(), InputBufferError> {
        self.try_send(InputMessage::Axes { combatant, x, z, attack })
    }

    pub fn send_command(&self, command: SessionCommand) -> Result<(), InputBufferError> {
        self.try_send(InputMessage::Command(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::ControlFlags;

    fn controls(attack_one: bool) -> InputMessage {
        InputMessage::Controls(ControlSnapshot {
            one: ControlFlags {
                attack: attack_one,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_input_buffer_submit_and_drain() {
        let buffer = InputBuffer::new(10);

        assert!(buffer.try_submit(controls(false)));
        assert!(buffer.try_submit(InputMessage::Command(SessionCommand::StartSession)));
        assert!(buffer.try_submit(controls(true)));
        assert_eq!(buffer.pending_count(), 3);

        let messages = buffer.drain();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], controls(false));
        assert_eq!(messages[1], InputMessage::Command(SessionCommand::StartSession));
        assert_eq!(messages[2], controls(true));

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_input_buffer_backpressure() {
        let buffer = InputBuffer::new(2);

        assert!(buffer.try_submit(controls(false)));
        assert!(buffer.try_submit(controls(false)));
        assert!(!buffer.try_submit(controls(false)));

        buffer.drain();
        assert!(buffer.try_submit(controls(false)));
    }

    #[test]
    fn test_input_sender_clone() {
        let buffer = InputBuffer::new(10);
        let sender1 = buffer.sender();
        let sender2 = sender1.clone();

        assert!(sender1.send_controls(ControlSnapshot::default()).is_ok());
        assert!(sender2.send_command(SessionCommand::RestartRound).is_ok());

        assert_eq!(buffer.drain().len(), 2);
    }

    #[test]
    fn test_sender_reports_full() {
        let buffer = InputBuffer::new(1);
        let sender = buffer.sender();
        assert!(sender.send_controls(ControlSnapshot::default()).is_ok());
        assert_eq!(
            sender.send_controls(ControlSnapshot::default()),
            Err(InputBufferError::Full)
        );
    }

    #[test]
    fn test_sender_reports_disconnected() {
        let buffer = InputBuffer::new(4);
        let sender = buffer.sender();
        drop(buffer);
        assert_eq!(
            sender.send_command(SessionCommand::StartSession),
            Err(InputBufferError::Disconnected)
        );
    }

    #[test]
    fn test_input_buffer_default() {
        assert_eq!(InputBuffer::default().capacity(), 256);
    }
}
