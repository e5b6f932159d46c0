///! Amateur band classification (2m / 70cm)

use super::types::Frequency;

/// 2-meter band edges (MHz)
pub const BAND_2M: (f64, f64) = (144.0, 148.0);

/// 70-centimeter band edges (MHz)
pub const BAND_70CM: (f64, f64) = (420.0, 450.0);

/// Check if a single frequency lies within [low, high]
pub fn within_band(freq: f64, low: f64, high: f64) -> bool {
    low <= freq && freq <= high
}

/// Check if both endpoints of a range lie within [low, high]
///
/// A range straddling either band edge is not contained. Endpoint order does
/// not matter.
pub fn range_within_band((start, stop): (f64, f64), low: f64, high: f64) -> bool {
    within_band(start, low, high) && within_band(stop, low, high)
}

/// Check if a parsed frequency lies entirely within [low, high]
///
/// Missing frequencies are never contained.
pub fn frequency_within_band(freq: Option<Frequency>, low: f64, high: f64) -> bool {
    match freq {
        Some(Frequency::Single(f)) => within_band(f, low, high),
        Some(Frequency::Range { start, stop }) => range_within_band((start, stop), low, high),
        None => false,
    }
}

pub fn is_2m(freq: Option<Frequency>) -> bool {
    frequency_within_band(freq, BAND_2M.0, BAND_2M.1)
}

pub fn is_70cm(freq: Option<Frequency>) -> bool {
    frequency_within_band(freq, BAND_70CM.0, BAND_70CM.1)
}

/// 2m or 70cm
pub fn is_vu(freq: Option<Frequency>) -> bool {
    is_2m(freq) || is_70cm(freq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(f: f64) -> Option<Frequency> {
        Some(Frequency::Single(f))
    }

    fn range(start: f64, stop: f64) -> Option<Frequency> {
        Some(Frequency::Range { start, stop })
    }

    #[test]
    fn test_is_2m() {
        assert!(is_2m(single(146.0)));
        assert!(is_2m(single(144.0)));
        assert!(is_2m(single(148.0)));
        assert!(!is_2m(single(149.0)));
        assert!(!is_2m(single(29.4)));
    }

    #[test]
    fn test_is_70cm() {
        assert!(is_70cm(single(435.0)));
        assert!(!is_70cm(single(145.8)));
        assert!(!is_70cm(single(2401.5)));
    }

    #[test]
    fn test_is_vu() {
        assert!(is_vu(single(145.825)));
        assert!(is_vu(single(437.8)));
        assert!(!is_vu(single(29.502)));
        assert!(!is_vu(None));
    }

    #[test]
    fn test_range_containment() {
        assert!(is_2m(range(145.85, 145.95)));
        assert!(is_2m(range(145.975, 145.925)));
        assert!(!is_2m(range(145.0, 150.0)));
        assert!(!is_2m(range(143.0, 145.0)));
        assert!(is_70cm(range(432.125, 432.175)));
        assert!(!is_vu(range(29.4, 29.5)));
    }

    #[test]
    fn test_range_straddling_both_bands() {
        assert!(!is_vu(range(145.0, 435.0)));
        assert!(range_within_band((145.0, 435.0), 144.0, 450.0));
        assert!(!range_within_band((145.0, 435.0), BAND_2M.0, BAND_2M.1));
    }
}
