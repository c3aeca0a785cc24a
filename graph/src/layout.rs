//! Graph nodes, links, and the force simulation.
//!
//! DESIGN
//! ======
//! Each [`Layout::step`] reads a snapshot of every node position, accumulates
//! forces from that snapshot, and only then integrates. Update order therefore
//! never affects the result, and every spring pulls both of its endpoints
//! equally.
//!
//! Forces per step:
//!
//! - repulsion between every pair of nodes, `k_r / d²` with `d²` floored at 1
//! - a spring along every link, `(d - rest) * k_s`
//! - a weak pull toward the canvas center
//!
//! Velocity decays by `damping` each step and positions are clamped so a node's
//! circle stays inside the canvas. The node being dragged is pinned: the
//! pointer owns its position and the simulation skips it.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashMap;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::consts::{
    BASE_RADIUS, DEFAULT_CENTER_FORCE, DEFAULT_DAMPING, DEFAULT_REPULSION, DEFAULT_SPRING_LENGTH,
    DEFAULT_SPRING_STRENGTH, MAX_EXTRA_RADIUS, MIN_DISTANCE, RADIUS_PER_LINK,
};
use crate::geom::Point;
use crate::note::{Note, NoteId};

// =============================================================================
// CONFIG
// =============================================================================

/// Simulation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub repulsion: f64,
    pub spring_length: f64,
    pub spring_strength: f64,
    pub damping: f64,
    pub center_force: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            repulsion: DEFAULT_REPULSION,
            spring_length: DEFAULT_SPRING_LENGTH,
            spring_strength: DEFAULT_SPRING_STRENGTH,
            damping: DEFAULT_DAMPING,
            center_force: DEFAULT_CENTER_FORCE,
        }
    }
}

impl PhysicsConfig {
    /// Read overrides from `DOUGHUB_GRAPH_*` environment variables.
    ///
    /// Missing, unparsable, or non-finite values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).and_then(|raw| raw.to_str().map(str::to_owned)))
    }

    /// Same as [`Self::from_env`] with an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            repulsion: env_parse(&lookup, "DOUGHUB_GRAPH_REPULSION", defaults.repulsion),
            spring_length: env_parse(&lookup, "DOUGHUB_GRAPH_SPRING_LENGTH", defaults.spring_length),
            spring_strength: env_parse(&lookup, "DOUGHUB_GRAPH_SPRING_STRENGTH", defaults.spring_strength),
            damping: env_parse(&lookup, "DOUGHUB_GRAPH_DAMPING", defaults.damping),
            center_force: env_parse(&lookup, "DOUGHUB_GRAPH_CENTER_FORCE", defaults.center_force),
        }
    }
}

fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + Into<f64>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value.into().is_finite() => value,
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid physics setting");
            default
        }
    }
}

// =============================================================================
// NODES AND LINKS
// =============================================================================

/// Simulation state for one note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: NoteId,
    pub title: String,
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
}

/// A directed link between two notes present in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub source: NoteId,
    pub target: NoteId,
}

/// Node radius for a note touching `links` links, outgoing plus incoming.
#[must_use]
pub fn radius_for_degree(links: usize) -> f64 {
    let extra = u32::try_from(links).map_or(MAX_EXTRA_RADIUS, |n| f64::from(n) * RADIUS_PER_LINK);
    BASE_RADIUS + extra.min(MAX_EXTRA_RADIUS)
}

/// Links between notes, dropping any whose target no longer exists.
#[must_use]
pub fn links_from_notes(notes: &[Note]) -> Vec<Link> {
    notes
        .iter()
        .flat_map(|note| {
            note.links
                .iter()
                .filter(|target| notes.iter().any(|n| n.id == **target))
                .map(|target| Link {
                    source: note.id.clone(),
                    target: target.clone(),
                })
        })
        .collect()
}

// =============================================================================
// LAYOUT
// =============================================================================

/// The simulated graph plus the canvas it lives in.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: Vec<GraphNode>,
    links: Vec<Link>,
    config: PhysicsConfig,
    width: f64,
    height: f64,
    pinned: Option<NoteId>,
    rng: StdRng,
}

impl Layout {
    /// Empty layout. `seed` drives the placement of new nodes.
    #[must_use]
    pub fn new(config: PhysicsConfig, seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            config,
            width: 0.0,
            height: 0.0,
            pinned: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[must_use]
    pub fn config(&self) -> PhysicsConfig {
        self.config
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Canvas size in CSS pixels.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Resize the canvas. Negative or non-finite sizes become zero.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
    }

    #[must_use]
    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// Pin a node so the simulation leaves it alone, or unpin with `None`.
    pub fn pin(&mut self, id: Option<NoteId>) {
        self.pinned = id;
    }

    /// Move a node directly and stop its momentum. Returns false if absent.
    pub fn set_node_position(&mut self, id: &str, position: Point) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        node.position = position;
        node.velocity = Point::ZERO;
        true
    }

    /// Rebuild nodes and links from `notes`.
    ///
    /// Existing nodes keep their position and velocity. New notes get a random
    /// position inside the canvas. Titles and radii are refreshed for all.
    pub fn sync(&mut self, notes: &[Note]) {
        let mut previous = self
            .nodes
            .drain(..)
            .map(|node| (node.id.clone(), node))
            .collect::<HashMap<_, _>>();

        let links = links_from_notes(notes);
        let mut degree = HashMap::<&str, usize>::new();
        for link in &links {
            *degree.entry(link.source.as_str()).or_default() += 1;
            *degree.entry(link.target.as_str()).or_default() += 1;
        }

        let mut nodes = Vec::with_capacity(notes.len());
        for note in notes {
            let radius = radius_for_degree(degree.get(note.id.as_str()).copied().unwrap_or(0));
            let node = match previous.remove(&note.id) {
                Some(existing) => GraphNode {
                    title: note.title.clone(),
                    radius,
                    ..existing
                },
                None => GraphNode {
                    id: note.id.clone(),
                    title: note.title.clone(),
                    position: self.random_position(),
                    velocity: Point::ZERO,
                    radius,
                },
            };
            nodes.push(node);
        }
        self.nodes = nodes;
        self.links = links;

        if self.pinned.as_ref().is_some_and(|id| self.node(id).is_none()) {
            self.pinned = None;
        }

        tracing::debug!(nodes = self.nodes.len(), links = self.links.len(), "synced graph layout");
    }

    fn random_position(&mut self) -> Point {
        let x = self.rng.random::<f64>() * self.width;
        let y = self.rng.random::<f64>() * self.height;
        Point::new(x, y)
    }

    /// Advance the simulation by `dt` nominal frames (`1.0` is one frame).
    ///
    /// Non-positive or non-finite `dt` does nothing.
    pub fn step(&mut self, dt: f64) {
        if self.nodes.is_empty() || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let config = self.config;
        let positions = self.nodes.iter().map(|n| n.position).collect::<Vec<_>>();
        let mut forces = vec![Point::ZERO; positions.len()];

        // Repulsion.
        for (i, &a) in positions.iter().enumerate() {
            for (j, &b) in positions.iter().enumerate().skip(i + 1) {
                let mut delta = a - b;
                if delta == Point::ZERO {
                    delta = Point::new(MIN_DISTANCE, 0.0);
                }
                let dist_sq = delta.length_sq().max(MIN_DISTANCE);
                let push = delta * (config.repulsion / (dist_sq * dist_sq.sqrt()));
                forces[i] += push;
                forces[j] -= push;
            }
        }

        // Springs.
        let index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect::<HashMap<_, _>>();
        for link in &self.links {
            let (Some(&a), Some(&b)) = (index.get(link.source.as_str()), index.get(link.target.as_str())) else {
                continue;
            };
            if a == b {
                continue;
            }
            let delta = positions[b] - positions[a];
            let dist = delta.length().max(MIN_DISTANCE);
            let pull = delta * ((dist - config.spring_length) * config.spring_strength / dist);
            forces[a] += pull;
            forces[b] -= pull;
        }

        let center = Point::new(self.width / 2.0, self.height / 2.0);
        let (width, height) = (self.width, self.height);
        for (node, force) in self.nodes.iter_mut().zip(forces) {
            if self.pinned.as_deref() == Some(node.id.as_str()) {
                continue;
            }
            let force = force + (center - node.position) * config.center_force;
            let velocity = (node.velocity + force * dt) * config.damping;
            let position = node.position + velocity * dt;
            if !position.is_finite() || !velocity.is_finite() {
                node.velocity = Point::ZERO;
                continue;
            }
            node.velocity = velocity;
            node.position = Point::new(
                clamp_axis(position.x, node.radius, width),
                clamp_axis(position.y, node.radius, height),
            );
        }
    }

    /// Endpoint positions for every link, for drawing edges.
    #[must_use]
    pub fn link_segments(&self) -> Vec<(Point, Point)> {
        self.links
            .iter()
            .filter_map(|link| {
                let source = self.node(&link.source)?;
                let target = self.node(&link.target)?;
                Some((source.position, target.position))
            })
            .collect()
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Keep a circle of `radius` inside `[0, extent]`, centering it when it cannot fit.
fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
    if extent < 2.0 * radius {
        extent / 2.0
    } else {
        value.clamp(radius, extent - radius)
    }
}
