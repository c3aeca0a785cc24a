//! Shared numeric constants for the graph crate.

// ── Physics defaults ────────────────────────────────────────────

/// Pairwise repulsion strength (`k / d²`).
pub const DEFAULT_REPULSION: f64 = 1000.0;

/// Spring rest length in pixels.
pub const DEFAULT_SPRING_LENGTH: f64 = 150.0;

/// Spring stiffness.
pub const DEFAULT_SPRING_STRENGTH: f64 = 0.05;

/// Velocity retained per frame.
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Pull toward the canvas center.
pub const DEFAULT_CENTER_FORCE: f64 = 0.0005;

/// Squared distances and spring lengths are floored here.
pub const MIN_DISTANCE: f64 = 1.0;

// ── Node sizing ─────────────────────────────────────────────────

/// Radius of a node with no links.
pub const BASE_RADIUS: f64 = 5.0;

/// Extra radius per outgoing link.
pub const RADIUS_PER_LINK: f64 = 2.0;

/// Cap on the link-derived extra radius.
pub const MAX_EXTRA_RADIUS: f64 = 15.0;

// ── Interaction ─────────────────────────────────────────────────

/// Hit slop around a node's radius, in pixels.
pub const HIT_TOLERANCE_PX: f64 = 5.0;

/// Pointer travel below this distance still counts as a click.
pub const DRAG_SLOP_PX: f64 = 3.0;

// ── Labels ──────────────────────────────────────────────────────

/// Titles longer than this are truncated with `...`.
pub const LABEL_MAX_CHARS: usize = 15;

/// Vertical gap between a node's bottom edge and its label baseline.
pub const LABEL_OFFSET_PX: f64 = 15.0;
