use serde::{Deserialize, Serialize};

/// A host input device the character controller listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// WASD/arrow locomotion and jump.
    LocomotionKeyboard,
    /// Mouse look while the pointer is locked to the canvas.
    PointerLock,
    /// Drag-to-rotate camera without locking the pointer.
    PointerCapture,
}

/// How the host camera follows the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraBehavior {
    FirstPerson,
    ThirdPerson,
}

/// The inputs and camera a scene configures on its character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    pub inputs: Vec<InputSource>,
    pub camera: CameraBehavior,
}

impl ControlScheme {
    /// Keyboard locomotion with pointer-lock mouse look.
    pub fn first_person() -> Self {
        Self {
            inputs: vec![InputSource::LocomotionKeyboard, InputSource::PointerLock],
            camera: CameraBehavior::FirstPerson,
        }
    }

    /// The character host's defaults: keyboard locomotion, drag to orbit.
    pub fn third_person() -> Self {
        Self {
            inputs: vec![
                InputSource::LocomotionKeyboard,
                InputSource::PointerCapture,
            ],
            camera: CameraBehavior::ThirdPerson,
        }
    }

    pub fn uses(&self, source: InputSource) -> bool {
        self.inputs.contains(&source)
    }
}

impl Default for ControlScheme {
    fn default() -> Self {
        Self::third_person()
    }
}

/// Mouse cursor shape requested from the windowing host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    Auto,
    Pointer,
}

/// Pointer events forwarded by the windowing host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Click anywhere on the canvas.
    CanvasClick,
    /// Click on the "Click to Restart" label.
    RestartLabelClick,
    /// Pointer entered (`true`) or left (`false`) the restart label.
    RestartLabelHover(bool),
    /// The host dropped pointer lock (Escape, focus loss).
    PointerLockLost,
}

/// A high-level action produced from host input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reset the game to its starting state.
    Restart,
    /// Ask the host to lock the pointer to the canvas.
    CapturePointer,
    /// The pointer is free again.
    ReleasePointer,
    /// Change the cursor shape.
    SetCursor(Cursor),
    /// Event has no meaning under the active scheme.
    Noop,
}

/// Translate a pointer event under the given control scheme.
pub fn map_pointer(scheme: &ControlScheme, event: PointerEvent) -> Action {
    let action = match event {
        PointerEvent::RestartLabelClick => Action::Restart,
        PointerEvent::RestartLabelHover(true) => Action::SetCursor(Cursor::Pointer),
        PointerEvent::RestartLabelHover(false) => Action::SetCursor(Cursor::Auto),
        PointerEvent::CanvasClick if scheme.uses(InputSource::PointerLock) => {
            Action::CapturePointer
        }
        PointerEvent::CanvasClick => Action::Noop,
        PointerEvent::PointerLockLost if scheme.uses(InputSource::PointerLock) => {
            Action::ReleasePointer
        }
        PointerEvent::PointerLockLost => Action::Noop,
    };
    tracing::trace!(?event, ?action, "mapped pointer event");
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_person_locks_pointer_on_click() {
        let scheme = ControlScheme::first_person();
        assert_eq!(scheme.camera, CameraBehavior::FirstPerson);
        assert_eq!(
            map_pointer(&scheme, PointerEvent::CanvasClick),
            Action::CapturePointer
        );
        assert_eq!(
            map_pointer(&scheme, PointerEvent::PointerLockLost),
            Action::ReleasePointer
        );
    }

    #[test]
    fn third_person_ignores_canvas_click() {
        let scheme = ControlScheme::third_person();
        assert!(!scheme.uses(InputSource::PointerLock));
        assert_eq!(
            map_pointer(&scheme, PointerEvent::CanvasClick),
            Action::Noop
        );
        assert_eq!(
            map_pointer(&scheme, PointerEvent::PointerLockLost),
            Action::Noop
        );
    }

    #[test]
    fn restart_label_restarts_under_any_scheme() {
        for scheme in [ControlScheme::first_person(), ControlScheme::third_person()] {
            assert_eq!(
                map_pointer(&scheme, PointerEvent::RestartLabelClick),
                Action::Restart
            );
        }
    }

    #[test]
    fn restart_label_hover_toggles_cursor() {
        let scheme = ControlScheme::default();
        assert_eq!(
            map_pointer(&scheme, PointerEvent::RestartLabelHover(true)),
            Action::SetCursor(Cursor::Pointer)
        );
        assert_eq!(
            map_pointer(&scheme, PointerEvent::RestartLabelHover(false)),
            Action::SetCursor(Cursor::Auto)
        );
    }
}
