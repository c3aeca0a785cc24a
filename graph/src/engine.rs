use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::geom::Point;
use crate::hit;
use crate::input::{Button, DragSession, InputState};
use crate::layout::{GraphNode, Layout, PhysicsConfig};
use crate::note::{Note, NoteError, NoteId, NotePatch, NoteStore};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A node was clicked without dragging; the host opens that note.
    NodeActivated(NoteId),
    SetCursor(String),
    RenderNeeded,
}

/// Core graph state: all logic that doesn't depend on the canvas element.
///
/// Separated from `GraphView` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Clone)]
pub struct GraphCore {
    pub notes: NoteStore,
    pub layout: Layout,
    pub input: InputState,
    pub hovered: Option<NoteId>,
    running: bool,
}

impl GraphCore {
    /// A running core with no notes. `seed` drives node placement.
    #[must_use]
    pub fn new(config: PhysicsConfig, seed: u64) -> Self {
        Self {
            notes: NoteStore::new(),
            layout: Layout::new(config, seed),
            input: InputState::Idle,
            hovered: None,
            running: true,
        }
    }

    // --- Data inputs ---

    /// Replace every note.
    pub fn load_notes(&mut self, notes: Vec<Note>) {
        self.notes = NoteStore::from_notes(notes);
        self.resync();
    }

    /// Create an untitled note and return its id.
    pub fn create_note(&mut self, now: &str) -> NoteId {
        let id = self.notes.create(now);
        self.resync();
        id
    }

    /// Edit a note.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NotFound`] if no note has `id`.
    pub fn update_note(&mut self, id: &str, patch: NotePatch, now: &str) -> Result<(), NoteError> {
        self.notes.update(id, patch, now)?;
        self.resync();
        Ok(())
    }

    /// Delete a note, dropping any hover or drag that targets it.
    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        let removed = self.notes.delete(id)?;
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        if self.input.session().is_some_and(|s| s.node_id == id) {
            self.input = InputState::Idle;
        }
        self.resync();
        Some(removed)
    }

    fn resync(&mut self) {
        self.layout.sync(self.notes.notes());
        if self.layout.pinned().is_none() && self.input.is_dragging() {
            self.input = InputState::Idle;
        }
    }

    // --- Viewport and frame loop ---

    /// Update the canvas size in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.layout.set_size(width, height);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume ticking after a teardown.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop ticking and release any drag in progress.
    pub fn teardown(&mut self) {
        self.running = false;
        self.release();
    }

    /// Advance one frame. Returns whether the host should redraw.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.running {
            return false;
        }
        self.layout.step(dt);
        true
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, point: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let Some(node) = hit::node_at(self.layout.nodes(), point) else {
            return Vec::new();
        };
        let id = node.id.clone();
        let position = node.position;
        tracing::debug!(%id, "drag session started");
        self.layout.pin(Some(id.clone()));
        self.layout.set_node_position(&id, position);
        self.input = InputState::Dragging(DragSession::new(id, point));
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        match &mut self.input {
            InputState::Dragging(session) => {
                session.track(point);
                self.layout.set_node_position(&session.node_id, point);
                vec![Action::RenderNeeded]
            }
            InputState::Idle => {
                let hovered = hit::node_at(self.layout.nodes(), point).map(|n| n.id.clone());
                if hovered == self.hovered {
                    return Vec::new();
                }
                let cursor = if hovered.is_some() { "pointer" } else { "default" };
                self.hovered = hovered;
                vec![Action::SetCursor(cursor.to_owned()), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let InputState::Dragging(session) = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        self.layout.pin(None);
        tracing::debug!(id = %session.node_id, moved = session.moved, "drag session ended");
        if session.is_click() {
            vec![Action::NodeActivated(session.node_id)]
        } else {
            Vec::new()
        }
    }

    /// The pointer left the canvas: end any drag without activating.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.release();
        Vec::new()
    }

    fn release(&mut self) {
        if let InputState::Dragging(session) = std::mem::take(&mut self.input) {
            tracing::debug!(id = %session.node_id, "drag session released");
            self.layout.pin(None);
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.layout.node(id)
    }
}

/// The browser-bound graph view. Wraps `GraphCore` and owns the canvas element.
pub struct GraphView {
    canvas: HtmlCanvasElement,
    pub core: GraphCore,
}

impl GraphView {
    /// Bind a view to `canvas`, sized to the canvas's current pixel size.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, seed: u64) -> Self {
        let mut core = GraphCore::new(PhysicsConfig::from_env(), seed);
        core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, core }
    }

    // --- Delegated data inputs ---

    pub fn load_notes(&mut self, notes: Vec<Note>) {
        self.core.load_notes(notes);
    }

    /// Create an untitled note stamped with the browser clock.
    pub fn create_note(&mut self) -> NoteId {
        self.core.create_note(&now_iso())
    }

    /// # Errors
    ///
    /// Returns [`NoteError::NotFound`] if no note has `id`.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> Result<(), NoteError> {
        self.core.update_note(id, patch, &now_iso())
    }

    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        self.core.delete_note(id)
    }

    // --- Viewport and frame loop ---

    /// Resize the canvas backing store and the simulation bounds together.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.core.set_viewport(f64::from(width), f64::from(height));
    }

    /// Animation-frame callback: step the layout and redraw.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn frame(&mut self, dt: f64) -> Result<(), JsValue> {
        if self.core.tick(dt) {
            self.render()?;
        }
        Ok(())
    }

    pub fn start(&mut self) {
        self.core.start();
    }

    pub fn teardown(&mut self) {
        self.core.teardown();
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, point: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(point, button)
    }

    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        self.core.on_pointer_move(point)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, &self.core.layout, self.core.hovered())
    }
}

fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}
