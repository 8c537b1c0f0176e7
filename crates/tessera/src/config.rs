//! Configuration types for Tessera layout.
//!
//! This module provides the configuration structures that control layout
//! geometry and time budgets. All types implement [`serde::Deserialize`] for
//! loading from external sources; missing fields fall back to defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and resolver settings.
//! - [`LayoutConfig`] - Canvas and node geometry shared by every strategy.
//! - [`ResolverConfig`] - Wall-clock budgets for layout and overlap resolution.
//!
//! # Example
//!
//! ```
//! # use tessera::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().width(), 1920.0);
//! assert!(config.resolver().max_total_time() > config.resolver().max_time_per_strategy());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use tessera_core::geometry::Size;

/// Top-level configuration combining layout geometry and resolver budgets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Layout geometry section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Resolver budget section.
    #[serde(default)]
    resolver: ResolverConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, resolver: ResolverConfig) -> Self {
        Self { layout, resolver }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the resolver configuration.
    pub fn resolver(&self) -> &ResolverConfig {
        &self.resolver
    }
}

/// Canvas and node geometry.
///
/// A read-only value passed into every strategy call. The options only ever
/// affect geometry, never control flow.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    width: f32,
    height: f32,
    node_width: f32,
    node_height: f32,
    node_separation: f32,
    edge_separation: f32,
    margin_x: f32,
    margin_y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            node_width: 120.0,
            node_height: 60.0,
            node_separation: 50.0,
            edge_separation: 20.0,
            margin_x: 40.0,
            margin_y: 40.0,
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Seed used for jitter when none is configured.
    pub const DEFAULT_SEED: u64 = 0x7e55_e4a0;

    /// Sets the canvas size.
    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the default node size.
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Sets the minimum node and edge separation.
    pub fn with_separation(mut self, node_separation: f32, edge_separation: f32) -> Self {
        self.node_separation = node_separation;
        self.edge_separation = edge_separation;
        self
    }

    /// Sets the canvas margins.
    pub fn with_margins(mut self, margin_x: f32, margin_y: f32) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    /// Sets the seed for randomized initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the canvas width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the canvas height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the canvas size.
    pub fn canvas(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the default node size.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Returns the minimum separation between node boxes.
    pub fn node_separation(&self) -> f32 {
        self.node_separation
    }

    /// Returns the minimum separation between parallel edge routes.
    pub fn edge_separation(&self) -> f32 {
        self.edge_separation
    }

    /// Returns the horizontal margin.
    pub fn margin_x(&self) -> f32 {
        self.margin_x
    }

    /// Returns the vertical margin.
    pub fn margin_y(&self) -> f32 {
        self.margin_y
    }

    /// Returns the configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the configured seed or [`Self::DEFAULT_SEED`].
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(Self::DEFAULT_SEED)
    }

    /// Returns the canvas area left inside the margins.
    ///
    /// Never negative.
    pub fn usable_size(&self) -> Size {
        Size::new(
            (self.width - 2.0 * self.margin_x).max(0.0),
            (self.height - 2.0 * self.margin_y).max(0.0),
        )
    }
}

/// Wall-clock budgets for a layout call.
///
/// Budgets are stored as milliseconds so they read naturally in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    max_time_per_strategy_ms: u64,
    max_total_time_ms: u64,
    layout_time_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_time_per_strategy_ms: 100,
            max_total_time_ms: 300,
            layout_time_ms: 500,
        }
    }
}

impl ResolverConfig {
    /// Creates a resolver configuration.
    pub fn new(max_time_per_strategy: Duration, max_total_time: Duration) -> Self {
        Self {
            max_time_per_strategy_ms: duration_to_ms(max_time_per_strategy),
            max_total_time_ms: duration_to_ms(max_total_time),
            ..Self::default()
        }
    }

    /// Sets the time budget for the initial layout strategy.
    pub fn with_layout_time(mut self, layout_time: Duration) -> Self {
        self.layout_time_ms = duration_to_ms(layout_time);
        self
    }

    /// Returns the ceiling for a single remediation attempt.
    pub fn max_time_per_strategy(&self) -> Duration {
        Duration::from_millis(self.max_time_per_strategy_ms)
    }

    /// Returns the ceiling for the whole resolution pass.
    pub fn max_total_time(&self) -> Duration {
        Duration::from_millis(self.max_total_time_ms)
    }

    /// Returns the ceiling for the initial layout strategy.
    pub fn layout_time(&self) -> Duration {
        Duration::from_millis(self.layout_time_ms)
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
