use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::LayoutError;

/// When the scheduler hands off from positioning to bundling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTrigger {
    /// Wait the full dwell period.
    #[default]
    Dwell,
    /// Hand off as soon as the primary layout cools, or after the dwell,
    /// whichever comes first.
    Settled,
}

/// Layout configuration loaded from `~/.risklayoutrc` (TOML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct LayoutConfig {
    /// Draw area in screen units.
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// Inset of the mapped coordinate ranges from the draw area edges.
    #[serde(default = "default_margin")]
    pub margin: f32,

    #[serde(default = "default_node_radius")]
    pub node_radius: f32,
    /// 0 disables collision avoidance.
    #[serde(default = "default_collide_strength")]
    pub collide_strength: f32,
    /// Relaxation passes per tick for collision avoidance.
    #[serde(default = "default_collide_iterations")]
    pub collide_iterations: usize,
    #[serde(default = "default_position_strength")]
    pub position_strength: f32,
    #[serde(default = "default_velocity_decay")]
    pub velocity_decay: f32,
    /// `None` keeps the simulation's stock cooling rate.
    #[serde(default)]
    pub primary_alpha_decay: Option<f32>,

    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
    #[serde(default)]
    pub trigger: PhaseTrigger,

    #[serde(default = "default_bundle_alpha_decay")]
    pub bundle_alpha_decay: f32,
    /// Positive values attract nearby control points.
    #[serde(default = "default_bundle_charge")]
    pub bundle_charge: f32,
    /// Range of the control-point charge. 0 turns the charge off.
    #[serde(default = "default_bundle_charge_max")]
    pub bundle_charge_max: f32,
    #[serde(default = "default_bundle_link_strength")]
    pub bundle_link_strength: f32,
    #[serde(default)]
    pub bundle_link_distance: f32,

    /// Segment count for a zero-length edge and for the draw-area diagonal.
    #[serde(default = "default_segments_min")]
    pub segments_min: f32,
    #[serde(default = "default_segments_max")]
    pub segments_max: f32,

    #[serde(default = "default_curve_beta")]
    pub curve_beta: f32,
    /// Samples per spline piece when flattening bundled curves.
    #[serde(default = "default_curve_segments")]
    pub curve_segments: usize,

    #[serde(default = "default_contour_cell_size")]
    pub contour_cell_size: f32,
    #[serde(default = "default_contour_bandwidth")]
    pub contour_bandwidth: f32,
    #[serde(default = "default_contour_thresholds")]
    pub contour_thresholds: usize,

    /// Seed for the jitter that separates coincident bodies.
    #[serde(default)]
    pub seed: u64,
}

fn default_width() -> f32 { 960.0 }
fn default_height() -> f32 { 600.0 }
fn default_margin() -> f32 { 20.0 }
fn default_node_radius() -> f32 { 8.0 }
fn default_collide_strength() -> f32 { 1.0 }
fn default_collide_iterations() -> usize { 1 }
fn default_position_strength() -> f32 { 0.1 }
fn default_velocity_decay() -> f32 { 0.4 }
fn default_dwell_ms() -> u64 { 6000 }
fn default_bundle_alpha_decay() -> f32 { 0.1 }
fn default_bundle_charge() -> f32 { 10.0 }
fn default_bundle_charge_max() -> f32 { 36.0 }
fn default_bundle_link_strength() -> f32 { 0.7 }
fn default_segments_min() -> f32 { 1.0 }
fn default_segments_max() -> f32 { 16.0 }
fn default_curve_beta() -> f32 { 0.85 }
fn default_curve_segments() -> usize { 8 }
fn default_contour_cell_size() -> f32 { 4.0 }
fn default_contour_bandwidth() -> f32 { 20.4939 }
fn default_contour_thresholds() -> usize { 10 }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
            node_radius: default_node_radius(),
            collide_strength: default_collide_strength(),
            collide_iterations: default_collide_iterations(),
            position_strength: default_position_strength(),
            velocity_decay: default_velocity_decay(),
            primary_alpha_decay: None,
            dwell_ms: default_dwell_ms(),
            trigger: PhaseTrigger::Dwell,
            bundle_alpha_decay: default_bundle_alpha_decay(),
            bundle_charge: default_bundle_charge(),
            bundle_charge_max: default_bundle_charge_max(),
            bundle_link_strength: default_bundle_link_strength(),
            bundle_link_distance: 0.0,
            segments_min: default_segments_min(),
            segments_max: default_segments_max(),
            curve_beta: default_curve_beta(),
            curve_segments: default_curve_segments(),
            contour_cell_size: default_contour_cell_size(),
            contour_bandwidth: default_contour_bandwidth(),
            contour_thresholds: default_contour_thresholds(),
            seed: 0,
        }
    }
}

impl LayoutConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Horizontal screen range nodes are mapped into.
    pub fn x_range(&self) -> [f32; 2] {
        [self.margin, (self.width - self.margin).max(self.margin)]
    }

    pub fn y_range(&self) -> [f32; 2] {
        [self.margin, (self.height - self.margin).max(self.margin)]
    }

    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, LayoutError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| LayoutError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects distances and sizes that must not be negative.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let lengths = [
            ("node_radius", self.node_radius),
            ("bundle_charge_max", self.bundle_charge_max),
            ("bundle_link_distance", self.bundle_link_distance),
        ];
        for (name, value) in lengths {
            if !(value >= 0.0) {
                return Err(LayoutError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}

/// Attempts to load the configuration from `~/.risklayoutrc`.
/// Falls back to default if the file is missing or invalid.
pub fn load_config() -> LayoutConfig {
    if let Ok(home) = env::var("HOME") {
        let path = PathBuf::from(home).join(".risklayoutrc");
        if let Ok(contents) = fs::read_to_string(path) {
            match LayoutConfig::from_toml(&contents) {
                Ok(config) => return config,
                Err(err) => {
                    eprintln!("Failed to parse ~/.risklayoutrc: {}", err);
                }
            }
        }
    }
    LayoutConfig::default()
}
