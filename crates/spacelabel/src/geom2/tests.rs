use super::*;
use nalgebra::Vector2;
use proptest::prelude::*;

fn v(x: f64, y: f64) -> Vector2<f64> {
    Vector2::new(x, y)
}

fn unit_square() -> Vec<Vector2<f64>> {
    vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]
}

#[test]
fn shoelace_sign_and_magnitude() {
    let sq = unit_square();
    assert!((signed_area(&sq) - 1.0).abs() < 1e-12);
    let mut cw = sq.clone();
    cw.reverse();
    assert!((signed_area(&cw) + 1.0).abs() < 1e-12);
    assert!(is_ccw(&sq) && !is_ccw(&cw));
    // closing duplicate adds a zero-length edge only
    let mut closed = sq.clone();
    closed.push(sq[0]);
    assert!((signed_area(&closed) - 1.0).abs() < 1e-12);
}

#[test]
fn shoelace_is_stable_at_epoch_offsets() {
    let t0 = 1.141e9;
    let ring: Vec<_> = unit_square().iter().map(|p| v(p.x + t0, p.y)).collect();
    assert!((signed_area(&ring) - 1.0).abs() < 1e-6);
}

#[test]
fn closure_helpers() {
    let mut ring = unit_square();
    assert!(!is_closed(&ring));
    assert_eq!(open_ring(&ring).len(), 4);
    ring.push(ring[0]);
    assert!(is_closed(&ring));
    assert_eq!(open_ring(&ring).len(), 4);
    assert!(!is_closed(&ring[..1]));
}

#[test]
fn rect_bounding_and_contains() {
    let r = Rect2::bounding(&[v(2.0, -1.0), v(-3.0, 4.0), v(0.5, 0.5)]).unwrap();
    assert_eq!(r.min, v(-3.0, -1.0));
    assert_eq!(r.max, v(2.0, 4.0));
    assert!(r.contains(v(0.0, 0.0)));
    assert!(!r.contains(v(2.5, 0.0)));
    assert!(Rect2::bounding(&[]).is_none());
}

#[test]
fn clip_to_own_extent_is_identity() {
    let eng = ClipEngine::default();
    let sq = unit_square();
    let window = Rect2::bounding(&sq).unwrap();
    let out = eng.intersect_with_axis_aligned_box(&sq, &window).unwrap();
    assert_eq!(out.len(), 5);
    assert_eq!(&out[..4], &sq[..]);
    assert_eq!(out[4], out[0]);
}

#[test]
fn clip_cuts_the_top_edge() {
    let eng = ClipEngine::default();
    let window = Rect2::new(v(-1.0, -1.0), v(2.0, 0.5));
    let out = eng
        .intersect_with_axis_aligned_box(&unit_square(), &window)
        .unwrap();
    let ys: Vec<f64> = out.iter().map(|p| p.y).collect();
    assert_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 0.5);
    assert!((signed_area(&out) - 0.5).abs() < 1e-12);
    assert!(is_ccw(&out));
}

#[test]
fn disjoint_or_touching_windows_are_empty() {
    let eng = ClipEngine::default();
    let far = Rect2::new(v(5.0, 5.0), v(6.0, 6.0));
    assert!(eng.intersect_with_axis_aligned_box(&unit_square(), &far).is_none());
    // shares only the edge x == 1
    let touching = Rect2::new(v(1.0, 0.0), v(2.0, 1.0));
    let eng_exact = ClipEngine::new(GeomCfg {
        eps_clip: 0.0,
        eps_dup: 1e-12,
    });
    assert!(eng_exact
        .intersect_with_axis_aligned_box(&unit_square(), &touching)
        .is_none());
}

#[test]
fn rings_below_three_vertexes_do_not_clip() {
    let eng = ClipEngine::default();
    let window = Rect2::new(v(-1.0, -1.0), v(2.0, 2.0));
    let seg = [v(0.0, 0.0), v(1.0, 1.0)];
    assert!(eng.intersect_with_axis_aligned_box(&seg, &window).is_none());
}

#[test]
fn concave_ring_inside_window_survives() {
    // L-shape
    let ring = vec![
        v(0.0, 0.0),
        v(2.0, 0.0),
        v(2.0, 1.0),
        v(1.0, 1.0),
        v(1.0, 2.0),
        v(0.0, 2.0),
    ];
    let eng = ClipEngine::default();
    let window = Rect2::new(v(0.0, 0.0), v(2.0, 1.5));
    let out = eng.intersect_with_axis_aligned_box(&ring, &window).unwrap();
    assert!((signed_area(&out) - 2.5).abs() < 1e-12);
}

fn star_ring() -> impl Strategy<Value = Vec<Vector2<f64>>> {
    (3usize..16, any::<u64>()).prop_map(|(n, seed)| {
        let mut s = seed;
        (0..n)
            .map(|k| {
                s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let r = 0.5 + (s >> 11) as f64 / (1u64 << 53) as f64;
                let th = std::f64::consts::TAU * k as f64 / n as f64;
                v(r * th.cos(), r * th.sin())
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn clipped_area_never_exceeds_subject(
        ring in star_ring(),
        x0 in -1.5f64..0.0, y0 in -1.5f64..0.0,
        w in 0.1f64..3.0, h in 0.1f64..3.0,
    ) {
        let eng = ClipEngine::default();
        let window = Rect2::new(v(x0, y0), v(x0 + w, y0 + h));
        if let Some(out) = eng.intersect_with_axis_aligned_box(&ring, &window) {
            prop_assert!(is_closed(&out));
            prop_assert!(signed_area(&out) <= signed_area(&ring) + 1e-4);
            prop_assert!(signed_area(&out) <= w * h + 1e-4);
            for p in &out {
                prop_assert!(p.x >= x0 - 1e-6 && p.x <= x0 + w + 1e-6);
                prop_assert!(p.y >= y0 - 1e-6 && p.y <= y0 + h + 1e-6);
            }
        }
    }

    #[test]
    fn clipping_is_idempotent(
        ring in star_ring(),
        x0 in -1.0f64..0.0, y0 in -1.0f64..0.0,
    ) {
        let eng = ClipEngine::default();
        let window = Rect2::new(v(x0, y0), v(x0 + 1.2, y0 + 1.2));
        if let Some(once) = eng.intersect_with_axis_aligned_box(&ring, &window) {
            let twice = eng.intersect_with_axis_aligned_box(&once, &window).unwrap();
            prop_assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(&twice) {
                prop_assert!((a - b).norm() < 1e-9);
            }
        }
    }
}
