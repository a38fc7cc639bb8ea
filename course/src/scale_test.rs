use super::*;

fn band(letter: &str, range: &str) -> GradeBand {
    GradeBand { letter: letter.into(), range: range.into(), ..GradeBand::default() }
}

fn standard_scale() -> Vec<GradeBand> {
    vec![
        band("A+", "90-100"),
        band("A", "85-89"),
        band("A-", "80-84"),
        band("B-", "70-72"),
        band("F", "59 and below"),
    ]
}

#[test]
fn parses_closed_range() {
    assert_eq!(band("A", "85-89").bounds(), Some((85.0, 89.0)));
    assert_eq!(band("A", " 85 - 89 ").bounds(), Some((85.0, 89.0)));
}

#[test]
fn parses_open_ranges() {
    assert_eq!(band("F", "59 and below").bounds(), Some((f64::NEG_INFINITY, 59.0)));
    assert_eq!(band("A+", "95 and above").bounds(), Some((95.0, f64::INFINITY)));
}

#[test]
fn parses_single_value() {
    assert_eq!(band("P", "70").bounds(), Some((70.0, 70.0)));
}

#[test]
fn rejects_garbage_and_inverted_ranges() {
    assert_eq!(band("?", "excellent").bounds(), None);
    assert_eq!(band("?", "90-80").bounds(), None);
    assert_eq!(band("?", "").bounds(), None);
    assert!(!band("?", "excellent").contains(90.0));
}

#[test]
fn bounds_are_inclusive() {
    let scale = standard_scale();
    assert_eq!(letter_for(&scale, 90.0).map(|b| b.letter.as_str()), Some("A+"));
    assert_eq!(letter_for(&scale, 100.0).map(|b| b.letter.as_str()), Some("A+"));
    assert_eq!(letter_for(&scale, 85.0).map(|b| b.letter.as_str()), Some("A"));
    assert_eq!(letter_for(&scale, 59.0).map(|b| b.letter.as_str()), Some("F"));
    assert_eq!(letter_for(&scale, 0.0).map(|b| b.letter.as_str()), Some("F"));
}

#[test]
fn fractional_totals_round_into_a_band() {
    let scale = standard_scale();
    assert_eq!(letter_for(&scale, 89.5).map(|b| b.letter.as_str()), Some("A+"));
    assert_eq!(letter_for(&scale, 89.4).map(|b| b.letter.as_str()), Some("A"));
}

#[test]
fn first_declared_band_wins() {
    let scale = vec![band("X", "0-100"), band("Y", "50-60")];
    assert_eq!(letter_for(&scale, 55.0).map(|b| b.letter.as_str()), Some("X"));
}

#[test]
fn gap_in_scale_yields_none() {
    let scale = standard_scale();
    // 73-79 is not covered by this reduced scale.
    assert!(letter_for(&scale, 75.0).is_none());
}
