use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, SurfaceInput, TouchPhase};

/// Current input state for a single window.
///
/// Only the first active touch drives the surface; further contacts are
/// ignored until it lifts.
#[derive(Debug, Default)]
pub struct InputState {
    /// Touch id currently driving the surface.
    primary_touch: Option<u64>,

    /// Held keys, used to tell presses from repeats.
    keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event and reports what it means for the surface, if anything.
    pub fn apply_event(&mut self, ev: &InputEvent) -> Option<SurfaceInput> {
        match *ev {
            InputEvent::Focused(focused) => {
                if !focused {
                    // On focus loss the release events are never delivered.
                    self.keys_down.clear();
                }
                None
            }

            InputEvent::PointerMoved { x, y } => Some(SurfaceInput::Sample { x, y }),

            InputEvent::PointerLeft => Some(SurfaceInput::Leave),

            InputEvent::Touch { id, phase, x, y } => self.apply_touch(id, phase, x, y),

            InputEvent::Key { key, state, repeat } => match state {
                KeyState::Pressed => {
                    let inserted = self.keys_down.insert(key);
                    (inserted && !repeat).then_some(SurfaceInput::KeyPressed(key))
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                    None
                }
            },
        }
    }

    fn apply_touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Option<SurfaceInput> {
        match phase {
            TouchPhase::Started => {
                if self.primary_touch.is_some() {
                    return None;
                }
                self.primary_touch = Some(id);
                Some(SurfaceInput::Sample { x, y })
            }
            TouchPhase::Moved => {
                (self.primary_touch == Some(id)).then_some(SurfaceInput::Sample { x, y })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.primary_touch != Some(id) {
                    return None;
                }
                self.primary_touch = None;
                Some(SurfaceInput::Leave)
            }
        }
    }
}
