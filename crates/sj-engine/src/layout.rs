//! One-time static placement of bars and instruments.
//!
//! Computed at construction and never touched by the per-frame tick.

use sj_ir::{key_color, KeyColor, Transform, Vec3, MALLET_RANGE};

/// Uniform scale of the mallet case, mallets and shadows.
pub const MALLET_CASE_SCALE: f32 = 0.667;

/// Lateral distance between neighbouring natural bars.
pub const BAR_SPACING: f32 = 1.333;

/// Natural-bar index placed at the centre of the case.
const NATURAL_CENTER: f32 = 26.0;

/// Accidental lateral position is linear in pitch: `BAR_SPACING * (pitch * SLOPE - OFFSET)`.
const ACCIDENTAL_SLOPE: f32 = 0.583;
const ACCIDENTAL_OFFSET: f32 = 38.2;

/// Offset of the whole mallet stage within the scene.
pub const MALLET_STAGE_OFFSET: Vec3 = Vec3::new(18.0, 0.0, -5.0);

/// Placement of a single bar and the parts hung off it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarLayout {
    pub pitch: u8,
    pub color: KeyColor,
    /// Bar node position within the case.
    pub position: Vec3,
    /// Scale of the bar model.
    pub bar_scale: Vec3,
    /// Mallet pivot, relative to `position`.
    pub mallet: Vec3,
    /// Strike shadow, relative to `position`.
    pub shadow: Vec3,
}

/// Lay out the bar for `pitch`.
///
/// `natural_index` counts natural keys from the bottom of the range and is
/// ignored for accidentals. Accidentals sit higher and further back so they
/// read as a second row behind the naturals.
pub fn bar_layout(pitch: u8, natural_index: usize) -> BarLayout {
    let p = pitch as f32;
    // Lower bars are longer
    let length = 0.5 * (MALLET_RANGE.high as f32 - p + 20.0) / 50.0;

    match key_color(pitch) {
        KeyColor::Natural => BarLayout {
            pitch,
            color: KeyColor::Natural,
            position: Vec3::new(BAR_SPACING * (natural_index as f32 - NATURAL_CENTER), 0.0, 0.0),
            bar_scale: Vec3::new(0.55, 1.0, length),
            mallet: Vec3::new(0.0, 1.35, -p / 11.5 + 19.0),
            shadow: Vec3::new(0.0, 0.75, -p / 11.5 + 11.0),
        },
        KeyColor::Accidental => BarLayout {
            pitch,
            color: KeyColor::Accidental,
            position: Vec3::new(
                BAR_SPACING * (p * ACCIDENTAL_SLOPE - ACCIDENTAL_OFFSET),
                0.0,
                -p / 50.0 + 2.667,
            ),
            bar_scale: Vec3::new(0.6, 0.7, length),
            mallet: Vec3::new(0.0, 2.6, p / 12.5 - 2.0),
            shadow: Vec3::new(0.0, 2.0, p / 12.5 - 10.0),
        },
    }
}

/// Lay out every bar in [`MALLET_RANGE`], bottom to top.
pub fn mallet_bars() -> impl Iterator<Item = BarLayout> {
    let mut naturals = 0;
    MALLET_RANGE.iter().map(move |pitch| {
        let layout = bar_layout(pitch, naturals);
        if layout.color == KeyColor::Natural {
            naturals += 1;
        }
        layout
    })
}

/// Placement of the `index`-th mallet instrument when several share the stage.
///
/// Instruments stack upward and fan out around the stage's vertical axis,
/// centred on the third.
pub fn ensemble_offset(index: usize) -> Transform {
    let i = index as f32 - 2.0;
    let yaw = -18.0 * i;
    let (sin, cos) = (libm::sinf(yaw.to_radians()), libm::cosf(yaw.to_radians()));
    let local = Vec3::new(-50.0, 26.5 + 2.0 * i, 0.0);
    let rotated = Vec3::new(
        cos * local.x + sin * local.z,
        local.y,
        -sin * local.x + cos * local.z,
    );
    Transform::from_translation(rotated + MALLET_STAGE_OFFSET).with_rotation(Vec3::new(0.0, yaw, 0.0))
}
