//! Tessera Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Tessera layout
//! engine and its callers. It includes:
//!
//! - **Geometry**: Points, sizes and axis-aligned bounds ([`geometry`] module)
//! - **Graph**: The abstract input graph handed over by content analysis
//!   ([`graph`] module)
//! - **Layout**: The positioned result consumed by renderers ([`layout`] module)

pub mod geometry;
pub mod graph;
pub mod layout;
