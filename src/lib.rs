//! # strata-tui
//!
//! The rendering core of a declarative terminal UI framework.
//!
//! A UI is described as an immutable [`Node`](node::Node) tree. Each commit reconciles
//! the new tree against the previous one, lays it out into screen cells, paints it as
//! abstract [`RenderCommand`](render::RenderCommand)s, and dispatches the commands to
//! output sinks. Only what changed is repainted.
//!
//! ## Core Systems
//!
//! - **[`node`]**: Immutable node tree, addresses, logical ids, typed properties
//! - **[`reconcile`]**: Tree diff producing insertions, updates, deletions and moves
//! - **[`layout`]**: Rule-based stack/panel layout with display-width text measurement
//! - **[`color`]**: Color parsing, themes, and capability fallback
//! - **[`render`]**: Render commands, paint engine, output sinks, crossterm sink
//! - **[`runtime`]**: Single-worker session runtime with commit cycles and animations
//! - **[`testing`]**: Command rasterizer and recording sinks for tests
//! - **[`geometry`]**: Screen regions

// Foundation
pub mod geometry;
pub mod node;

// Pipeline stages
pub mod color;
pub mod layout;
pub mod reconcile;
pub mod render;

// Orchestration
pub mod runtime;

// Test support
pub mod testing;
