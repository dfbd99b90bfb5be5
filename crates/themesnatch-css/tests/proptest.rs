//! Property-based tests for color and spacing helpers.

use proptest::prelude::*;
use themesnatch_css::{
    cluster, parse_color, parse_length, quantize, tonal_scale, Clusterable, Rgb,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct Weighted {
    rgb: Rgb,
    frequency: u32,
}

impl Clusterable for Weighted {
    fn rgb(&self) -> Rgb {
        self.rgb
    }
    fn frequency(&self) -> u32 {
        self.frequency
    }
    fn absorb(&mut self, other: Self) {
        self.frequency += other.frequency;
    }
}

fn rgb_strategy() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

fn weighted_strategy() -> impl Strategy<Value = Weighted> {
    (rgb_strategy(), 1u32..1000).prop_map(|(rgb, frequency)| Weighted { rgb, frequency })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Formatting then parsing a color gives the same color back.
    #[test]
    fn hex_round_trip_is_stable(rgb in rgb_strategy()) {
        let hex = rgb.to_hex();
        prop_assert_eq!(parse_color(&hex).unwrap(), rgb);
        prop_assert_eq!(parse_color(&hex).unwrap().to_hex(), hex);
    }

    /// rgb() notation parses to the same value as its hex form.
    #[test]
    fn rgb_function_matches_hex(rgb in rgb_strategy()) {
        let functional = format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b);
        prop_assert_eq!(parse_color(&functional).unwrap(), rgb);
    }

    /// Clustering never loses or invents frequency.
    #[test]
    fn cluster_conserves_frequency(
        items in prop::collection::vec(weighted_strategy(), 0..60),
        threshold in 0.0f64..120.0,
    ) {
        let total: u32 = items.iter().map(|i| i.frequency).sum();
        let count = items.len();
        let groups = cluster(items, threshold);
        prop_assert_eq!(groups.iter().map(|g| g.frequency).sum::<u32>(), total);
        prop_assert!(groups.len() <= count);
    }

    /// Cluster output is ranked by frequency.
    #[test]
    fn cluster_output_is_sorted(items in prop::collection::vec(weighted_strategy(), 0..40)) {
        let groups = cluster(items, 25.0);
        prop_assert!(groups.windows(2).all(|w| w[0].frequency >= w[1].frequency));
    }

    /// Representatives of distinct clusters are at least `threshold` apart.
    #[test]
    fn cluster_representatives_are_separated(
        items in prop::collection::vec(weighted_strategy(), 0..40),
    ) {
        let groups = cluster(items, 30.0);
        for (i, a) in groups.iter().enumerate() {
            for b in groups.iter().skip(i + 1) {
                prop_assert!(a.rgb.distance(b.rgb) >= 30.0);
            }
        }
    }

    /// Tonal scales always keep the base color at 500 and get darker along the ladder.
    #[test]
    fn tonal_scale_is_monotonic(base in rgb_strategy()) {
        let scale = tonal_scale(base);
        prop_assert_eq!(scale.get(500), Some(base));
        let shades: Vec<Rgb> = scale.iter().map(|(_, c)| c).collect();
        prop_assert!(shades.windows(2).all(|w| w[0].brightness() >= w[1].brightness()));
    }

    /// Pixel lengths parse exactly and always quantize to some scale step.
    #[test]
    fn px_lengths_parse_and_quantize(px in 1u32..400) {
        let value = format!("{}px", px);
        prop_assert_eq!(parse_length(&value), Some(px as f64));
        prop_assert!(!quantize(px as f64).is_empty());
    }
}
