//! Handler trait for routed input

use super::events::InputEvent;
use super::state::InputState;

/// Priority of the battle's own handler; overlays that must see input
/// before the board register above it
pub const GAME_PRIORITY: u32 = 50;

/// A consumer of semantic input events
///
/// [`InputContext`](super::InputContext) offers each event to handlers from
/// the highest priority down and stops at the first one that consumes it.
pub trait InputHandler {
    /// Shown in the debug window's routing section
    fn name(&self) -> &str;

    /// Higher values see events first
    fn priority(&self) -> u32;

    /// Returns true to consume `event`
    fn handle_event(&mut self, event: &InputEvent, state: &InputState) -> bool;

    /// Runs once per frame after all events were dispatched
    fn update(&mut self, _state: &InputState) {}

    /// For downcasting to the concrete handler from the runner
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
