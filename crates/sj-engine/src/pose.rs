//! Visibility and model-swap policy.

use crate::recoil::RecoilPhase;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which of a body's two models is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pose {
    #[default]
    Up,
    Down,
}

impl Pose {
    /// `Down` while the body is struck or returning, `Up` at rest.
    pub fn for_phase(phase: RecoilPhase) -> Self {
        match phase {
            RecoilPhase::Idle => Pose::Up,
            RecoilPhase::Struck | RecoilPhase::Returning => Pose::Down,
        }
    }

    pub fn is_down(self) -> bool {
        self == Pose::Down
    }
}

/// Scale of the shadow a striker casts as it nears the strike.
///
/// 0 when fully raised, 0.5 at impact.
pub fn shadow_scale(angle: f32, max_angle: f32) -> f32 {
    ((1.0 - angle / max_angle) / 2.0).clamp(0.0, 0.5)
}
