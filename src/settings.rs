//! Ball and table configuration
//!
//! Configuration is immutable once built. A display-size change produces a
//! new, scaled copy via `Settings::scaled`; nothing is mutated in place.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Per-ball physics parameters (shared by every ball on the table)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    pub radius: f32,
    /// Speed of a full-strength shot
    pub v_max: f32,
    /// Below this speed a ball snaps to rest
    pub v_min: f32,
    /// Nominal step; one tick uses twice this value
    pub time_span: f32,
    /// Per-tick velocity multiplier
    pub attenuation: f32,
    pub anim_gain: f32,
    pub anim_frames: u32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_SIZE / 2.0,
            v_max: V_MAX,
            v_min: V_MIN,
            time_span: TIME_SPAN,
            attenuation: V_ATTENUATION,
            anim_gain: ANIM_GAIN,
            anim_frames: ANIM_FRAMES,
        }
    }
}

impl BallConfig {
    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Time span actually applied per tick
    #[inline]
    pub fn tick_span(&self) -> f32 {
        2.0 * self.time_span
    }

    /// Scale lengths and speeds; dimensionless values are kept
    pub fn scaled(&self, ratio: f32) -> Self {
        Self {
            radius: self.radius * ratio,
            v_max: self.v_max * ratio,
            v_min: self.v_min * ratio,
            ..*self
        }
    }
}

/// Base table dimensions from which the table geometry is derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Top-left corner of the table frame
    pub origin_x: f32,
    pub origin_y: f32,
    /// Outer frame size
    pub bottom_width: f32,
    pub bottom_height: f32,
    /// Frame thickness around the cloth
    pub edge_big: f32,
    /// Cushion inset next to each pocket
    pub edge_small: f32,
    /// Width of the middle pocket opening
    pub middle: f32,
    /// Corner jaw offset of the collision points
    pub dis_corner: f32,
    /// Middle jaw offset of the collision points
    pub dis_middle: f32,
    /// How far the middle pockets sit outside the cushion line
    pub hole_center_revise: f32,
    /// Extra pull-in of the bottom middle pocket
    pub bottom_middle_nudge: f32,
    pub corner_hole_radius: f32,
    pub middle_hole_radius: f32,
    /// Rack apex distance from the left cushion
    pub rack_apex_offset: f32,
    pub rack_gap: f32,
    /// Cue ball distance left of the rack apex
    pub cue_ball_offset: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            origin_x: TABLE_X,
            origin_y: TABLE_Y,
            bottom_width: BOTTOM_WIDTH,
            bottom_height: BOTTOM_HEIGHT,
            edge_big: EDGE_BIG,
            edge_small: EDGE_SMALL,
            middle: MIDDLE,
            dis_corner: DIS_CORNER,
            dis_middle: DIS_MIDDLE,
            hole_center_revise: HOLE_CENTER_REVISE,
            bottom_middle_nudge: BOTTOM_MIDDLE_NUDGE,
            corner_hole_radius: CORNER_HOLE_R,
            middle_hole_radius: MIDDLE_HOLE_R,
            rack_apex_offset: RACK_APEX_OFFSET,
            rack_gap: GAP_BETWEEN_BALLS,
            cue_ball_offset: CUE_BALL_OFFSET,
        }
    }
}

impl TableConfig {
    /// Every field is a length, so everything scales
    pub fn scaled(&self, ratio: f32) -> Self {
        Self {
            origin_x: self.origin_x * ratio,
            origin_y: self.origin_y * ratio,
            bottom_width: self.bottom_width * ratio,
            bottom_height: self.bottom_height * ratio,
            edge_big: self.edge_big * ratio,
            edge_small: self.edge_small * ratio,
            middle: self.middle * ratio,
            dis_corner: self.dis_corner * ratio,
            dis_middle: self.dis_middle * ratio,
            hole_center_revise: self.hole_center_revise * ratio,
            bottom_middle_nudge: self.bottom_middle_nudge * ratio,
            corner_hole_radius: self.corner_hole_radius * ratio,
            middle_hole_radius: self.middle_hole_radius * ratio,
            rack_apex_offset: self.rack_apex_offset * ratio,
            rack_gap: self.rack_gap * ratio,
            cue_ball_offset: self.cue_ball_offset * ratio,
        }
    }
}

/// Complete simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub ball: BallConfig,
    pub table: TableConfig,

    // === Timing ===
    /// Physics tick period
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u32,
    /// Countdown length of a round
    #[serde(default = "default_round_seconds")]
    pub round_seconds: u32,
    /// Countdown mode: the round ends when the clock runs out and the score
    /// is the seconds left
    #[serde(default = "default_countdown")]
    pub countdown: bool,
}

fn default_tick_interval() -> u32 {
    TICK_INTERVAL_MS
}

fn default_round_seconds() -> u32 {
    ROUND_SECONDS
}

fn default_countdown() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball: BallConfig::default(),
            table: TableConfig::default(),
            tick_interval_ms: TICK_INTERVAL_MS,
            round_seconds: ROUND_SECONDS,
            countdown: true,
        }
    }
}

impl Settings {
    /// Uniformly scaled copy of these settings
    pub fn scaled(&self, ratio: f32) -> Result<Self, SettingsError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(SettingsError::InvalidScale(ratio));
        }
        let scaled = Self {
            ball: self.ball.scaled(ratio),
            table: self.table.scaled(ratio),
            ..self.clone()
        };
        scaled.validate()?;
        Ok(scaled)
    }

    /// Reject values the physics cannot run with: non-positive lengths,
    /// speeds and time steps, a negative rest threshold, or damping outside
    /// (0, 1]
    pub fn validate(&self) -> Result<(), SettingsError> {
        let ball = &self.ball;
        positive("ball.radius", ball.radius)?;
        positive("ball.v_max", ball.v_max)?;
        positive("ball.time_span", ball.time_span)?;
        check("ball.v_min", ball.v_min, ball.v_min >= 0.0)?;
        check(
            "ball.attenuation",
            ball.attenuation,
            ball.attenuation > 0.0 && ball.attenuation <= 1.0,
        )?;
        check("ball.anim_gain", ball.anim_gain, ball.anim_gain >= 0.0)?;

        let table = &self.table;
        for (field, value) in [
            ("table.bottom_width", table.bottom_width),
            ("table.bottom_height", table.bottom_height),
            ("table.edge_big", table.edge_big),
            ("table.edge_small", table.edge_small),
            ("table.middle", table.middle),
            ("table.corner_hole_radius", table.corner_hole_radius),
            ("table.middle_hole_radius", table.middle_hole_radius),
        ] {
            positive(field, value)?;
        }
        for (field, value) in [
            ("table.origin_x", table.origin_x),
            ("table.origin_y", table.origin_y),
            ("table.dis_corner", table.dis_corner),
            ("table.dis_middle", table.dis_middle),
            ("table.hole_center_revise", table.hole_center_revise),
            ("table.bottom_middle_nudge", table.bottom_middle_nudge),
            ("table.rack_apex_offset", table.rack_apex_offset),
            ("table.rack_gap", table.rack_gap),
            ("table.cue_ball_offset", table.cue_ball_offset),
        ] {
            check(field, value, value.is_finite())?;
        }
        check(
            "tick_interval_ms",
            self.tick_interval_ms as f32,
            self.tick_interval_ms > 0,
        )?;
        Ok(())
    }

    /// Tick period in seconds
    pub fn tick_seconds(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

fn check(field: &'static str, value: f32, ok: bool) -> Result<(), SettingsError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::Invalid { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    check(field, value, value > 0.0)
}

/// Screen orientation of the target surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Letterbox fit of the design resolution onto a target surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenScale {
    /// Left/top offset of the scaled design area
    pub offset_x: i32,
    pub offset_y: i32,
    pub ratio: f32,
    pub orientation: Orientation,
}

impl ScreenScale {
    const LANDSCAPE: (f32, f32) = (800.0, 480.0);
    const PORTRAIT: (f32, f32) = (480.0, 800.0);

    /// Fit the design resolution into `width` x `height`, limited by whichever
    /// axis runs out first, and centre it on the other axis
    pub fn fit(width: f32, height: f32) -> Self {
        let orientation = if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let (design_w, design_h) = match orientation {
            Orientation::Landscape => Self::LANDSCAPE,
            Orientation::Portrait => Self::PORTRAIT,
        };

        if width / height > design_w / design_h {
            // Wider than design: height limits
            let ratio = height / design_h;
            let offset_x = (width - design_w * ratio) / 2.0;
            Self {
                offset_x: offset_x as i32,
                offset_y: 0,
                ratio,
                orientation,
            }
        } else {
            let ratio = width / design_w;
            let offset_y = (height - design_h * ratio) / 2.0;
            Self {
                offset_x: 0,
                offset_y: offset_y as i32,
                ratio,
                orientation,
            }
        }
    }
}
