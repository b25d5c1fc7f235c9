//! Game input handler
//!
//! Turns routed input events into actions for the tactics simulation. Key
//! presses pass through unchanged; clicks inside the board viewport are
//! converted to viewport-local coordinates.

use super::context::Rect;
use super::events::{InputEvent, MouseButton, ViewportId};
use super::handler::{GAME_PRIORITY, InputHandler};
use super::state::InputState;
use crate::sim::Key;

/// Action queued for the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameAction {
    Key(Key),
    /// Click inside the board viewport, relative to its top-left corner
    ViewportClick {
        local_pos: [f32; 2],
        button: MouseButton,
    },
}

/// Handler feeding keyboard and board clicks into the game
pub struct GameInputHandler {
    viewport: ViewportId,
    viewport_rect: Option<Rect>,
    actions: Vec<GameAction>,
    hovered: Option<[f32; 2]>,
}

impl GameInputHandler {
    pub fn new(viewport: ViewportId) -> Self {
        Self {
            viewport,
            viewport_rect: None,
            actions: Vec::new(),
            hovered: None,
        }
    }

    /// Viewport this handler reacts to
    pub fn viewport(&self) -> ViewportId {
        self.viewport
    }

    /// Updates the on-screen rect of the board viewport
    pub fn set_viewport_rect(&mut self, rect: Rect) {
        self.viewport_rect = Some(rect);
    }

    /// Drains queued actions in arrival order
    pub fn take_actions(&mut self) -> Vec<GameAction> {
        std::mem::take(&mut self.actions)
    }

    /// Mouse position relative to the board viewport, if hovering it
    pub fn hovered(&self) -> Option<[f32; 2]> {
        self.hovered
    }

    fn local(&self, pos: [f32; 2]) -> Option<[f32; 2]> {
        self.viewport_rect
            .map(|rect| [pos[0] - rect.x, pos[1] - rect.y])
    }
}

impl InputHandler for GameInputHandler {
    fn name(&self) -> &str {
        "game"
    }

    fn priority(&self) -> u32 {
        GAME_PRIORITY
    }

    fn handle_event(&mut self, event: &InputEvent, _state: &InputState) -> bool {
        match event {
            InputEvent::KeyPress { key, .. } => {
                self.actions.push(GameAction::Key(*key));
                true
            }
            InputEvent::Click {
                button,
                pos,
                viewport: Some(id),
            } if *id == self.viewport => match self.local(*pos) {
                Some(local_pos) => {
                    self.actions.push(GameAction::ViewportClick {
                        local_pos,
                        button: *button,
                    });
                    true
                }
                None => false,
            },
            InputEvent::Hover { pos, viewport } => {
                self.hovered = match viewport {
                    Some(id) if *id == self.viewport => self.local(*pos),
                    _ => None,
                };
                false
            }
            _ => false,
        }
    }

    fn update(&mut self, state: &InputState) {
        if state.mouse.screen_pos.is_none() {
            self.hovered = None;
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
