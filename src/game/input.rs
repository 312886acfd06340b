//! Input mapping
//!
//! Turns per-frame control flags into a movement vector and an attack intent
//! per player. Raw device state never reaches the simulator; only [`Intent`]s do.

use serde::{Deserialize, Serialize};

use crate::game::state::CombatantId;
use crate::util::vec3::Vec3;

/// Input boundary errors
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("non-finite movement axis ({x}, {z})")]
    NonFinite { x: f32, z: f32 },
}

/// Boolean control flags for one player for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    pub move_left: bool,
    pub move_right: bool,
    /// Toward -Z
    pub move_forward: bool,
    /// Toward +Z
    pub move_backward: bool,
    pub attack: bool,
}

/// Control flags for both players for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub one: ControlFlags,
    pub two: ControlFlags,
}

impl ControlSnapshot {
    pub fn get(&self, id: CombatantId) -> &ControlFlags {
        match id {
            CombatantId::One => &self.one,
            CombatantId::Two => &self.two,
        }
    }

    pub fn get_mut(&mut self, id: CombatantId) -> &mut ControlFlags {
        match id {
            CombatantId::One => &mut self.one,
            CombatantId::Two => &mut self.two,
        }
    }
}

/// What a player wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Desired movement on the X/Z plane; each axis in [-1, 1]
    pub movement: Vec3,
    pub attack: bool,
}

impl Intent {
    /// Build an intent from analog axes, rejecting non-finite values.
    /// Axes are clamped to [-1, 1].
    pub fn from_axes(x: f32, z: f32, attack: bool) -> Result<Self, InputError> {
        if !(x.is_finite() && z.is_finite()) {
            return Err(InputError::NonFinite { x, z });
        }
        Ok(Self {
            movement: Vec3::planar(x.clamp(-1.0, 1.0), z.clamp(-1.0, 1.0)),
            attack,
        })
    }

    #[inline]
    pub fn has_movement(&self) -> bool {
        self.movement.x != 0.0 || self.movement.z != 0.0
    }
}

/// Map control flags to an intent. Opposing flags cancel out; diagonals are
/// not normalised.
pub fn map(flags: &ControlFlags) -> Intent {
    let axis = |neg: bool, pos: bool| -> f32 { (pos as i8 - neg as i8) as f32 };
    Intent {
        movement: Vec3::planar(
            axis(flags.move_left, flags.move_right),
            axis(flags.move_forward, flags.move_backward),
        ),
        attack: flags.attack,
    }
}

/// Map both players' flags
pub fn map_snapshot(snapshot: &ControlSnapshot) -> [Intent; 2] {
    [map(&snapshot.one), map(&snapshot.two)]
}

/// Physical keys the default layout understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    F,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    L,
    Enter,
    R,
}

/// What a key does when held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Left(CombatantId),
    Right(CombatantId),
    Forward(CombatantId),
    Backward(CombatantId),
    Attack(CombatantId),
    Restart,
}

/// Result of reading the keyboard for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardFrame {
    pub controls: ControlSnapshot,
    pub restart: bool,
}

/// Key-to-action table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: Vec<(Key, Action)>,
}

impl Default for KeyBindings {
    /// Player one on WASD + F/Space, player two on the arrows + L/Enter, R restarts
    fn default() -> Self {
        use Action::*;
        use CombatantId::{One, Two};
        Self {
            bindings: vec![
                (Key::A, Left(One)),
                (Key::D, Right(One)),
                (Key::W, Forward(One)),
                (Key::S, Backward(One)),
                (Key::F, Attack(One)),
                (Key::Space, Attack(One)),
                (Key::ArrowLeft, Left(Two)),
                (Key::ArrowRight, Right(Two)),
                (Key::ArrowUp, Forward(Two)),
                (Key::ArrowDown, Backward(Two)),
                (Key::L, Attack(Two)),
                (Key::Enter, Attack(Two)),
                (Key::R, Restart),
            ],
        }
    }
}

impl KeyBindings {
    pub fn new(bindings: Vec<(Key, Action)>) -> Self {
        Self { bindings }
    }

    /// Add or replace the action bound to `key`
    pub fn bind(&mut self, key: Key, action: Action) {
        self.bindings.retain(|(k, _)| *k != key);
        self.bindings.push((key, action));
    }

    pub fn action(&self, key: Key) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, action)| *action)
    }

    /// Fold the currently held keys into control flags
    pub fn read<'a>(&self, pressed: impl IntoIterator<Item = &'a Key>) -> KeyboardFrame {
        let mut frame = KeyboardFrame::default();
        for key in pressed {
            let Some(action) = self.action(*key) else {
                continue;
            };
            match action {
                Action::Left(id) => frame.controls.get_mut(id).move_left = true,
                Action::Right(id) => frame.controls.get_mut(id).move_right = true,
                Action::Forward(id) => frame.controls.get_mut(id).move_forward = true,
                Action::Backward(id) => frame.controls.get_mut(id).move_backward = true,
                Action::Attack(id) => frame.controls.get_mut(id).attack = true,
                Action::Restart => frame.restart = true,
            }
        }
        frame
    }
}
