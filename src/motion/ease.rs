/// Easing functions used to shape the zoom ramp.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-out.
    OutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for ease in [
            Ease::Linear,
            Ease::InQuad,
            Ease::OutQuad,
            Ease::InOutQuad,
            Ease::OutCubic,
        ] {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-3.0), 0.0);
        assert_eq!(Ease::Linear.apply(5.0), 1.0);
    }

    #[test]
    fn monotone_on_unit_interval() {
        for ease in [Ease::Linear, Ease::InQuad, Ease::OutQuad, Ease::InOutQuad] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = ease.apply(f64::from(i) / 100.0);
                assert!(v >= prev - 1e-12, "{ease:?} not monotone at {i}");
                prev = v;
            }
        }
    }
}
