//! Force-directed note graph for the notebook view.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It keeps the
//! notebook's notes, derives `[[wikilink]]` edges between them, and animates a
//! spring/repulsion layout one frame at a time. The host JavaScript layer owns
//! the animation-frame loop: it calls [`engine::GraphView::frame`] once per
//! display refresh, forwards pointer events, and calls
//! [`engine::GraphView::teardown`] when the view unmounts.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser-bound [`engine::GraphView`] and testable [`engine::GraphCore`] |
//! | [`note`] | Notes, wikilink extraction, and the in-memory note store |
//! | [`layout`] | Graph nodes, links, and the force simulation step |
//! | [`input`] | Pointer buttons and the drag gesture state machine |
//! | [`hit`] | Hit-testing the pointer against nodes |
//! | [`render`] | Canvas drawing and node styling |
//! | [`geom`] | 2D points and vectors |
//! | [`consts`] | Physics defaults, node sizing, and interaction thresholds |

pub mod consts;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layout;
pub mod note;
pub mod render;
