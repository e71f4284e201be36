//! Rail tween math
//!
//! Pure functions computing where the rail goes in each phase. Everything is
//! measured along the active axis; nothing here reads a clock or keeps state.

use rail_core::{BoundingBox, RailState};

/// Geometry parameters for the stretch and shrink phases
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenParams {
    /// Resting size of the rail
    pub diameter: f64,
    /// Thickness lost per unit of travel while stretched
    pub cross_squash: f64,
    /// Thickness the stretched rail never goes below
    pub min_cross_size: f64,
}

impl Default for TweenParams {
    fn default() -> Self {
        Self {
            diameter: 24.0,
            cross_squash: 0.0625,
            min_cross_size: 2.0,
        }
    }
}

/// The stretched rail spanning its old and new positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StretchFrame {
    pub position: f64,
    pub size: f64,
    /// Reduced thickness across the axis
    pub cross_size: f64,
}

/// Rail of `diameter` centered on `target`
pub fn centered(target: BoundingBox, diameter: f64) -> RailState {
    RailState::new(target.center() - diameter / 2.0, diameter)
}

/// Stretch from `current` toward `target`
///
/// The stretched box starts at whichever end is behind in the direction of
/// travel and grows by the travel distance. Returns `None` when the rail is
/// already centered on the target.
pub fn stretch(
    current: RailState,
    target: BoundingBox,
    params: &TweenParams,
) -> Option<StretchFrame> {
    let target_position = centered(target, params.diameter).position;
    let distance = target_position - current.position;
    if distance == 0.0 {
        return None;
    }

    let travel = distance.abs();
    let position = if distance < 0.0 {
        target_position
    } else {
        current.position
    };
    let cross_size = (params.diameter - travel * params.cross_squash).max(params.min_cross_size);

    Some(StretchFrame {
        position,
        size: current.size + travel,
        cross_size,
    })
}

/// Final resting box of `final_diameter` centered on `target`
pub fn shrink(target: BoundingBox, final_diameter: f64) -> RailState {
    centered(target, final_diameter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TweenParams {
        TweenParams::default()
    }

    #[test]
    fn test_shrink_centers_on_target() {
        let rest = shrink(BoundingBox::new(100.0, 40.0), 24.0);
        assert_eq!(rest, RailState::new(108.0, 24.0));
    }

    #[test]
    fn test_stretch_forward() {
        // Centered position of this box is 188 + 24 - 12 = 200
        let frame = stretch(
            RailState::new(0.0, 24.0),
            BoundingBox::new(188.0, 48.0),
            &params(),
        )
        .unwrap();

        assert_eq!(frame.position, 0.0);
        assert_eq!(frame.size, 224.0);
        assert_eq!(frame.cross_size, 24.0 - 200.0 * 0.0625);
    }

    #[test]
    fn test_stretch_backward_anchors_at_target() {
        let frame = stretch(
            RailState::new(200.0, 24.0),
            BoundingBox::new(0.0, 24.0),
            &params(),
        )
        .unwrap();

        assert_eq!(frame.position, 0.0);
        assert_eq!(frame.size, 224.0);
    }

    #[test]
    fn test_stretch_cross_size_floor() {
        let frame = stretch(
            RailState::new(0.0, 24.0),
            BoundingBox::new(2000.0, 24.0),
            &params(),
        )
        .unwrap();

        assert_eq!(frame.cross_size, 2.0);
    }

    #[test]
    fn test_stretch_short_hop_keeps_most_thickness() {
        let frame = stretch(
            RailState::new(0.0, 24.0),
            BoundingBox::new(16.0, 24.0),
            &params(),
        )
        .unwrap();

        assert_eq!(frame.size, 40.0);
        assert_eq!(frame.cross_size, 23.0);
    }

    #[test]
    fn test_stretch_noop_when_already_centered() {
        let current = centered(BoundingBox::new(100.0, 40.0), 24.0);
        assert!(stretch(current, BoundingBox::new(100.0, 40.0), &params()).is_none());
    }

    #[test]
    fn test_stretch_grows_from_current_size() {
        // A rail placed with a different size still grows by the travel
        let frame = stretch(
            RailState::new(10.0, 4.0),
            BoundingBox::new(40.0, 24.0),
            &params(),
        )
        .unwrap();

        assert_eq!(frame.size, 4.0 + 30.0);
    }
}
