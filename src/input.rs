//! Input events, the FIFO queue feeding the frame pipeline, and the
//! movement controller they accumulate into.
//!
//! Key transitions are *accumulated*: a press adds the binding's signed unit
//! to its axis and the matching release subtracts it, so simultaneous
//! opposite holds cancel to zero net movement. This requires the window
//! layer to filter key auto-repeat, otherwise the accumulator drifts.

use std::collections::{HashMap, VecDeque};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A movement or look axis the controller accumulates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Strafe left/right.
    MoveX,
    /// Vertical up/down.
    MoveY,
    /// Forward/back (forward is -Z).
    MoveZ,
    /// Yaw.
    LookX,
    /// Pitch.
    LookY,
}

/// A key's contribution: one signed unit on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding {
    /// Which axis the key drives.
    pub axis: Axis,
    /// Signed unit contribution while held (+1 or -1).
    pub dir: f32,
}

/// Platform-agnostic input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Zero every controller axis (enqueued on focus loss, when key
    /// releases can no longer be observed).
    Reset,
    /// A digital key transition for a bound axis.
    Key {
        /// The axis contribution of the key that changed.
        binding: AxisBinding,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
}

/// FIFO queue of pending input events.
pub struct InputQueue {
    buf: VecDeque<InputEvent>,
}

impl InputQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: VecDeque::new(),
        }
    }

    /// Enqueue an event.
    pub fn push(&mut self, event: InputEvent) {
        self.buf.push_back(event);
    }

    /// Dequeue the oldest event, if any.
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.buf.pop_front()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulated movement/look state, integrated by the camera each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controller {
    /// Movement axes (x strafe, y vertical, z forward/back).
    pub movement: Vec3,
    /// Look axes (x yaw, y pitch).
    pub look: Vec2,
}

impl Controller {
    /// Apply one input event.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Reset => *self = Self::default(),
            InputEvent::Key { binding, pressed } => {
                let unit = if pressed { binding.dir } else { -binding.dir };
                *self.axis_mut(binding.axis) += unit;
            }
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::MoveX => &mut self.movement.x,
            Axis::MoveY => &mut self.movement.y,
            Axis::MoveZ => &mut self.movement.z,
            Axis::LookX => &mut self.look.x,
            Axis::LookY => &mut self.look.y,
        }
    }
}

/// Maps physical key strings to [`AxisBinding`]s.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format: `"KeyW"`,
/// `"ArrowUp"`, `"ShiftLeft"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → axis contribution.
    bindings: HashMap<String, AxisBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let unit = |axis, dir| AxisBinding { axis, dir };
        let bindings = HashMap::from([
            ("KeyW".into(), unit(Axis::MoveZ, -1.0)),
            ("KeyS".into(), unit(Axis::MoveZ, 1.0)),
            ("KeyA".into(), unit(Axis::MoveX, -1.0)),
            ("KeyD".into(), unit(Axis::MoveX, 1.0)),
            ("ShiftLeft".into(), unit(Axis::MoveY, 1.0)),
            ("ControlLeft".into(), unit(Axis::MoveY, -1.0)),
            ("ArrowUp".into(), unit(Axis::LookY, 1.0)),
            ("ArrowDown".into(), unit(Axis::LookY, -1.0)),
            ("ArrowLeft".into(), unit(Axis::LookX, -1.0)),
            ("ArrowRight".into(), unit(Axis::LookX, 1.0)),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the axis contribution for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<AxisBinding> {
        self.bindings.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(axis: Axis, dir: f32, pressed: bool) -> InputEvent {
        InputEvent::Key {
            binding: AxisBinding { axis, dir },
            pressed,
        }
    }

    #[test]
    fn opposite_holds_cancel() {
        let mut ctrl = Controller::default();
        ctrl.apply(key(Axis::MoveZ, -1.0, true)); // forward down
        ctrl.apply(key(Axis::MoveZ, 1.0, true)); // back down
        assert_eq!(ctrl.movement.z, 0.0);

        // Releasing one restores the other's unit contribution.
        ctrl.apply(key(Axis::MoveZ, 1.0, false)); // back up
        assert_eq!(ctrl.movement.z, -1.0);
        ctrl.apply(key(Axis::MoveZ, -1.0, false)); // forward up
        assert_eq!(ctrl.movement.z, 0.0);
    }

    #[test]
    fn reset_zeroes_all_axes() {
        let mut ctrl = Controller::default();
        ctrl.apply(key(Axis::MoveX, 1.0, true));
        ctrl.apply(key(Axis::LookY, -1.0, true));
        ctrl.apply(InputEvent::Reset);
        assert_eq!(ctrl, Controller::default());
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Reset);
        queue.push(key(Axis::MoveX, 1.0, true));
        assert_eq!(queue.pop(), Some(InputEvent::Reset));
        assert!(matches!(queue.pop(), Some(InputEvent::Key { .. })));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn default_bindings_cover_all_axes() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.lookup("KeyW"),
            Some(AxisBinding {
                axis: Axis::MoveZ,
                dir: -1.0
            })
        );
        assert!(keys.lookup("ArrowLeft").is_some());
        assert!(keys.lookup("KeyQ").is_none());
    }
}
