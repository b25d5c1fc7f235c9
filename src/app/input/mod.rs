//! Input handling system
//!
//! Provides a clean, priority-based input routing system that:
//! - Collects raw input from winit events
//! - Generates semantic input events (clicks, hovers, key presses)
//! - Routes events to handlers in priority order
//! - Supports event consumption to prevent input conflicts
//! - Handles multiple viewports with automatic hit testing
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit) → InputCollector → InputState
//!                                          ↓
//!                                    InputContext
//!                                    (generates events)
//!                                          ↓
//!                                   InputHandlers
//!                                   (by priority)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! // In App::new()
//! let mut input_context = InputContext::new();
//! input_context.register_handler(Box::new(GameInputHandler::new(ViewportId(0))));
//!
//! // In window_event()
//! collector.handle_window_event(&event);
//!
//! // Each frame, before simulation update
//! input_context.update_state(collector.clone_state());
//! input_context.process();
//! collector.advance_frame();
//! ```

mod collector;
mod context;
mod events;
mod game_handler;
mod handler;
mod state;

// Re-export public API
pub use collector::InputCollector;
pub use context::{InputContext, Rect};
pub use events::{InputEvent, MouseButton, ViewportId, game_key};
pub use game_handler::{GameAction, GameInputHandler};
pub use handler::{GAME_PRIORITY, InputHandler};
pub use state::{ButtonState, InputState, KeyboardState, Modifiers, MouseButtons, MouseState};
