//! Latitude-banded prevailing winds shared by rain-shadow blocking (spec
//! §4.5).

/// Prevailing wind vector `(dx, dy)` for normalized latitude `phi = y /
/// (height - 1)`. Vectors are unit steps in grid space; `dy` is always 0 —
/// every band blows purely east-west.
pub fn prevailing_wind(phi: f64) -> (i64, i64) {
    if phi < 1.0 / 3.0 {
        (-1, 0) // Trade Winds: blow westward.
    } else if phi <= 2.0 / 3.0 {
        (1, 0) // Westerlies: blow eastward.
    } else {
        (-1, 0) // Polar Easterlies: blow westward.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_winds_band() {
        assert_eq!(prevailing_wind(0.0), (-1, 0));
        assert_eq!(prevailing_wind(0.32), (-1, 0));
    }

    #[test]
    fn westerlies_band() {
        assert_eq!(prevailing_wind(0.5), (1, 0));
        assert_eq!(prevailing_wind(1.0 / 3.0), (1, 0));
        assert_eq!(prevailing_wind(2.0 / 3.0), (1, 0));
    }

    #[test]
    fn polar_easterlies_band() {
        assert_eq!(prevailing_wind(0.9), (-1, 0));
    }
}
