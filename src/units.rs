//! Point → pixel conversion.
//!
//! PDF geometry is expressed in points (1/72 inch). The rendered markup uses
//! CSS pixels at a fixed ratio of 1.333 px per point, rounded to two decimal
//! places so the emitted `style` attributes stay short and stable.

/// CSS pixels per PDF point.
pub const PX_PER_POINT: f64 = 1.333;

/// Convert a value in points to pixels, rounded to two decimals.
///
/// Every coordinate, size and font size goes through this exactly once,
/// at render time. The normalised [`crate::model::PageModel`] stays in points.
pub fn to_pixels(points: f64) -> f64 {
    round2(points * PX_PER_POINT)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(to_pixels(0.0), 0.0);
    }

    #[test]
    fn letter_page_width() {
        // 612pt × 1.333 = 815.796 → 815.8
        assert_eq!(to_pixels(612.0), 815.8);
    }

    #[test]
    fn close_to_ratio_within_rounding() {
        for p in [0.5, 1.0, 12.0, 40.0, 72.0, 199.99, 595.28, 1000.0] {
            let px = to_pixels(p);
            assert!((px - p * PX_PER_POINT).abs() <= 0.005 + 1e-9, "p={p} px={px}");
        }
    }

    #[test]
    fn monotonic() {
        let mut prev = to_pixels(0.0);
        for i in 1..2000 {
            let cur = to_pixels(i as f64 * 0.37);
            assert!(cur >= prev, "not monotonic at step {i}");
            prev = cur;
        }
    }
}
