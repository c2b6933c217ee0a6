//! Static table geometry
//!
//! Cushion bounds, jaw collision points, pockets and the rack layout, all
//! derived from a `TableConfig` and the ball radius. The layout (y grows
//! downward):
//!
//! ```text
//!   M    A           B  N  C           D    O
//!   L +---------------------------------+ E
//!     |                                 |
//!     |                                 |
//!   K +---------------------------------+ F
//!   R    J           I  Q  H           G    P
//! ```
//!
//! A..L are the twelve jaw points where cushions meet pocket openings,
//! M..R the six pocket centres. N and Q are the middle pockets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::{BallConfig, TableConfig};

/// Number of balls in a full rack (cue ball + 15 object balls)
pub const RACK_SIZE: usize = 16;
/// Index of the cue ball in the rack and the ball list
pub const CUE_BALL: usize = 0;

/// Pocket radius class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PocketKind {
    Corner,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub center: Vec2,
    pub kind: PocketKind,
}

/// Which straight cushion a ball ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cushion {
    Left,
    Right,
    Top,
    Bottom,
}

impl Cushion {
    /// Unit normal pointing back onto the cloth
    pub fn normal(self) -> Vec2 {
        match self {
            Cushion::Left => Vec2::X,
            Cushion::Right => Vec2::NEG_X,
            Cushion::Top => Vec2::Y,
            Cushion::Bottom => Vec2::NEG_Y,
        }
    }
}

/// Playing-area rectangle (cushion lines)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub bounds: Bounds,
    /// Jaw points A..L in clockwise order from the top-left
    pub collision_points: [Vec2; 12],
    /// Pocket centres M..R; indices 1 and 4 are the middle pockets
    pub pockets: [Pocket; 6],
    pub corner_hole_radius: f32,
    pub middle_hole_radius: f32,
    /// Starting centres: cue ball first, then the triangle from the apex
    pub rack: [Vec2; RACK_SIZE],
}

impl Table {
    pub fn new(config: &TableConfig, ball: &BallConfig) -> Self {
        let left = config.origin_x + config.edge_big;
        let top = config.origin_y + config.edge_big;
        let area_width = config.bottom_width - config.edge_big * 2.0;
        let area_height = config.bottom_height - config.edge_big * 2.0;
        let right = left + area_width;
        let bottom = top + area_height;

        // Cushion length between a corner jaw and a middle jaw
        let ab = (area_width - config.middle) / 2.0 - config.edge_small;
        // Side cushion length
        let ef = area_height - config.edge_small * 2.0;

        let near_corner_x = left + config.edge_small - config.dis_corner;
        let middle_left_x = left + config.edge_small + ab + config.dis_middle;
        let middle_right_x = left + config.edge_small + ab + config.middle - config.dis_middle;
        let far_corner_x = left + config.edge_small + ab * 2.0 + config.middle + config.dis_corner;
        let upper_y = top + config.edge_small - config.dis_corner;
        let lower_y = top + config.edge_small + ef + config.dis_corner;

        let collision_points = [
            Vec2::new(near_corner_x, top), // A
            Vec2::new(middle_left_x, top), // B
            Vec2::new(middle_right_x, top), // C
            Vec2::new(far_corner_x, top), // D
            Vec2::new(right, upper_y), // E
            Vec2::new(right, lower_y), // F
            Vec2::new(far_corner_x, bottom), // G
            Vec2::new(middle_right_x, bottom), // H
            Vec2::new(middle_left_x, bottom), // I
            Vec2::new(near_corner_x, bottom), // J
            Vec2::new(left, lower_y), // K
            Vec2::new(left, upper_y), // L
        ];

        let middle_x = left + config.edge_small + ab + config.middle / 2.0;
        let corner = |center| Pocket {
            center,
            kind: PocketKind::Corner,
        };
        let middle = |center| Pocket {
            center,
            kind: PocketKind::Middle,
        };
        let pockets = [
            corner(Vec2::new(left, top)),
            middle(Vec2::new(middle_x, top - config.hole_center_revise)),
            corner(Vec2::new(right, top)),
            corner(Vec2::new(right, bottom)),
            middle(Vec2::new(
                middle_x,
                bottom + config.hole_center_revise - config.bottom_middle_nudge,
            )),
            corner(Vec2::new(left, bottom)),
        ];

        let rack = rack_positions(
            Vec2::new(left + config.rack_apex_offset + ball.radius, top + area_height / 2.0),
            ball.diameter() + config.rack_gap,
            config.cue_ball_offset,
        );

        Self {
            bounds: Bounds {
                left,
                right,
                top,
                bottom,
            },
            collision_points,
            pockets,
            corner_hole_radius: config.corner_hole_radius,
            middle_hole_radius: config.middle_hole_radius,
            rack,
        }
    }

    /// Uniformly scaled copy (display-size hook)
    pub fn scaled(&self, ratio: f32) -> Self {
        let mut table = self.clone();
        table.bounds = Bounds {
            left: self.bounds.left * ratio,
            right: self.bounds.right * ratio,
            top: self.bounds.top * ratio,
            bottom: self.bounds.bottom * ratio,
        };
        for p in table.collision_points.iter_mut() {
            *p *= ratio;
        }
        for pocket in table.pockets.iter_mut() {
            pocket.center *= ratio;
        }
        for slot in table.rack.iter_mut() {
            *slot *= ratio;
        }
        table.corner_hole_radius *= ratio;
        table.middle_hole_radius *= ratio;
        table
    }

    /// Capture radius for a pocket class
    #[inline]
    pub fn pocket_radius(&self, kind: PocketKind) -> f32 {
        match kind {
            PocketKind::Corner => self.corner_hole_radius,
            PocketKind::Middle => self.middle_hole_radius,
        }
    }

    /// Cue-ball starting slot, also the anchor of the respawn search
    #[inline]
    pub fn cue_spot(&self) -> Vec2 {
        self.rack[CUE_BALL]
    }
}

/// Rack centres: cue ball at `cue_offset` left of the apex, then five rows
/// of object balls opening to the right, each row stepping half a spacing
/// down and listed bottom to top.
fn rack_positions(apex: Vec2, spacing: f32, cue_offset: f32) -> [Vec2; RACK_SIZE] {
    let row_dx = spacing * (std::f32::consts::PI / 3.0).sin();
    let row_dy = spacing * (std::f32::consts::PI / 3.0).cos();

    let mut positions = [Vec2::ZERO; RACK_SIZE];
    positions[CUE_BALL] = Vec2::new(apex.x - cue_offset, apex.y);

    let mut i = 1;
    for row in 0..5 {
        let row_start = Vec2::new(apex.x + row_dx * row as f32, apex.y + row_dy * row as f32);
        for k in 0..=row {
            positions[i] = row_start - Vec2::new(0.0, spacing * k as f32);
            i += 1;
        }
    }

    positions
}
