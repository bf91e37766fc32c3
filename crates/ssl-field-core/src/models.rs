//! Ball physics model parameters.

use std::sync::Arc;

use ssl_field_proto::{SslBallModelChipFixedLoss, SslBallModelStraightTwoPhase, SslGeometryModels};

use crate::var::{VarDouble, VarList};

/// Two-phase model for straight kicks: the ball slides, then rolls once its
/// speed drops below `k_switch` times the kick speed.
#[derive(Debug)]
pub struct BallModelStraightTwoPhase {
    pub settings: VarList,
    pub acc_slide: VarDouble,
    pub acc_roll: VarDouble,
    pub k_switch: VarDouble,
}

impl Default for BallModelStraightTwoPhase {
    fn default() -> Self {
        let model = Self {
            settings: VarList::new("Straight Two-Phase"),
            acc_slide: VarDouble::bounded("Sliding acceleration [m/s^2]", -3.0, -20.0, 0.0),
            acc_roll: VarDouble::bounded("Rolling acceleration [m/s^2]", -0.4, -20.0, 0.0),
            k_switch: VarDouble::bounded("Switch factor", 0.7, 0.0, 1.0),
        };
        model.settings.add_child(Arc::clone(model.acc_slide.var()));
        model.settings.add_child(Arc::clone(model.acc_roll.var()));
        model.settings.add_child(Arc::clone(model.k_switch.var()));
        model
    }
}

impl BallModelStraightTwoPhase {
    pub fn to_proto(&self) -> SslBallModelStraightTwoPhase {
        SslBallModelStraightTwoPhase {
            acc_slide: self.acc_slide.get(),
            acc_roll: self.acc_roll.get(),
            k_switch: self.k_switch.get(),
        }
    }
}

/// Chip kicks lose a fixed fraction of their velocity on every hop.
#[derive(Debug)]
pub struct BallModelChipFixedLoss {
    pub settings: VarList,
    pub damping_xy_first_hop: VarDouble,
    pub damping_xy_other_hops: VarDouble,
    pub damping_z: VarDouble,
}

impl Default for BallModelChipFixedLoss {
    fn default() -> Self {
        let model = Self {
            settings: VarList::new("Chip fix loss"),
            damping_xy_first_hop: VarDouble::bounded("Damping (xy) on first hop", 0.6, 0.0, 1.0),
            damping_xy_other_hops: VarDouble::bounded("Damping (xy) on other hops", 0.95, 0.0, 1.0),
            damping_z: VarDouble::bounded("Damping (z)", 0.7, 0.0, 1.0),
        };
        model.settings.add_child(Arc::clone(model.damping_xy_first_hop.var()));
        model.settings.add_child(Arc::clone(model.damping_xy_other_hops.var()));
        model.settings.add_child(Arc::clone(model.damping_z.var()));
        model
    }
}

impl BallModelChipFixedLoss {
    pub fn to_proto(&self) -> SslBallModelChipFixedLoss {
        SslBallModelChipFixedLoss {
            damping_xy_first_hop: self.damping_xy_first_hop.get(),
            damping_xy_other_hops: self.damping_xy_other_hops.get(),
            damping_z: self.damping_z.get(),
        }
    }
}

/// The "Models" settings group.
#[derive(Debug)]
pub struct FieldModels {
    pub settings: VarList,
    pub straight_two_phase: BallModelStraightTwoPhase,
    pub chip_fixed_loss: BallModelChipFixedLoss,
}

impl Default for FieldModels {
    fn default() -> Self {
        let models = Self {
            settings: VarList::new("Models"),
            straight_two_phase: BallModelStraightTwoPhase::default(),
            chip_fixed_loss: BallModelChipFixedLoss::default(),
        };
        models
            .settings
            .add_child(Arc::clone(models.straight_two_phase.settings.var()));
        models
            .settings
            .add_child(Arc::clone(models.chip_fixed_loss.settings.var()));
        models
    }
}

impl FieldModels {
    /// Writes both models into `buffer`. Callers hold the field read lock.
    pub(crate) fn fill(&self, buffer: &mut SslGeometryModels) {
        buffer.straight_two_phase = Some(self.straight_two_phase.to_proto());
        buffer.chip_fixed_loss = Some(self.chip_fixed_loss.to_proto());
    }
}
