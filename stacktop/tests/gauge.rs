//! Bar gauge math and color bands.

use stacktop::ui::frame::Tone;
use stacktop::ui::gauge::{bar, filled_cells, tone_for};

#[test]
fn filled_cells_clamp_then_floor_over_the_whole_range() {
    for width in [10usize, 30, 37] {
        for p in -10..=110 {
            let p = p as f64;
            let expected = (p.clamp(0.0, 100.0) * width as f64 / 100.0).floor() as usize;
            assert_eq!(filled_cells(p, width), expected, "p={p} width={width}");
        }
    }
}

#[test]
fn fractional_percentages_round_down() {
    assert_eq!(filled_cells(49.9, 30), 14);
    assert_eq!(filled_cells(3.33, 30), 0);
    assert_eq!(filled_cells(99.99, 30), 29);
    assert_eq!(filled_cells(f64::NAN, 30), 0);
}

#[test]
fn color_bands_follow_thresholds() {
    assert_eq!(tone_for(0.0), Tone::Normal);
    assert_eq!(tone_for(50.0), Tone::Normal);
    assert_eq!(tone_for(50.1), Tone::Warning);
    assert_eq!(tone_for(80.0), Tone::Warning);
    assert_eq!(tone_for(80.5), Tone::Alert);
    assert_eq!(tone_for(250.0), Tone::Alert);
}

#[test]
fn bar_has_fixed_width_and_right_justified_percentage() {
    for p in [-5.0, 0.0, 7.0, 50.0, 100.0, 140.0] {
        let text: String = bar(p, 30).iter().map(|s| s.text.as_str()).collect();
        // brackets + cells + " NNN%"
        assert_eq!(text.chars().count(), 30 + 2 + 5, "p={p}: {text:?}");
    }
    let half: String = bar(50.0, 30).iter().map(|s| s.text.as_str()).collect();
    assert_eq!(half.matches('█').count(), 15);
    assert!(half.ends_with("  50%"), "{half:?}");
    let full: String = bar(140.0, 10).iter().map(|s| s.text.as_str()).collect();
    assert!(full.ends_with(" 100%"), "{full:?}");
    let empty: String = bar(-10.0, 10).iter().map(|s| s.text.as_str()).collect();
    assert!(empty.ends_with("   0%"), "{empty:?}");
}
