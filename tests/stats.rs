use coelute::math::stats::{mean, median, pearson, ranks};

#[test]
fn mean_basic() {
    assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    assert_eq!(mean(&[]), 0.0);
}

#[test]
fn median_odd_even() {
    let mut v1 = vec![3.0, 1.0, 2.0];
    assert_eq!(median(&mut v1), 2.0);
    let mut v2 = vec![4.0, 1.0, 2.0, 3.0];
    assert_eq!(median(&mut v2), 2.5);
}

#[test]
fn pearson_perfect_correlation() {
    let x = vec![1.0, 2.0, 3.0, 4.0];
    let y = vec![2.0, 4.0, 6.0, 8.0];
    let r = pearson(&x, &y).unwrap();
    assert!((r - 1.0).abs() < 1e-12);
}

#[test]
fn pearson_anticorrelation() {
    let x = vec![1.0, 2.0, 3.0];
    let y = vec![3.0, 2.0, 1.0];
    let r = pearson(&x, &y).unwrap();
    assert!((r + 1.0).abs() < 1e-12);
}

#[test]
fn pearson_zero_variance_is_undefined() {
    let flat = vec![5.0, 5.0, 5.0];
    let y = vec![1.0, 2.0, 3.0];
    assert!(pearson(&flat, &y).is_none());
    assert!(pearson(&y, &flat).is_none());
}

#[test]
fn pearson_length_mismatch() {
    assert!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
    assert!(pearson(&[1.0], &[1.0]).is_none());
}

#[test]
fn ranks_with_ties() {
    let r = ranks(&[10.0, 20.0, 20.0, 30.0]);
    assert_eq!(r, vec![1.0, 2.5, 2.5, 4.0]);
}

#[test]
fn ranks_distinct() {
    let r = ranks(&[3.0, 1.0, 2.0]);
    assert_eq!(r, vec![3.0, 1.0, 2.0]);
}
