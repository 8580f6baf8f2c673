//! Derivative-free minimizers used by steering and positioning.
//!
//! - [`golden_section`]: bracketed 1-D search, used to refine acceleration angles.
//! - [`nelder_mead`]: 2-D downhill simplex, used to find open space on the field.
//!
//! Both are tolerant of odd objectives: non-finite samples are treated as
//! worse than any finite value, and a search that never sees a finite value
//! reports failure so the caller can fall back to its own estimate.

use glam::Vec2;

/// 1/phi, the golden-section shrink factor.
const INV_PHI: f32 = 0.618_034;

/// Hard cap on golden-section iterations; tolerance normally stops far earlier.
const GOLDEN_MAX_ITERATIONS: u32 = 64;

fn finite_or_max(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        f32::MAX
    }
}

/// Minimizes `f` on `[lo, hi]` by golden-section search.
///
/// Returns the best `(x, f(x))` seen, or `None` if the bracket is empty or
/// `f` never produced a finite value.
///
/// # Example
///
/// ```
/// use scrimmage_core::optimize::golden_section;
///
/// let (x, fx) = golden_section(|x| (x - 1.5).powi(2), 0.0, 4.0, 1e-5).unwrap();
/// assert!((x - 1.5).abs() < 1e-3);
/// assert!(fx < 1e-5);
/// ```
pub fn golden_section<F>(f: F, lo: f32, hi: f32, tolerance: f32) -> Option<(f32, f32)>
where
    F: Fn(f32) -> f32,
{
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return None;
    }
    let eval = |x: f32| finite_or_max(f(x));

    let (mut a, mut b) = (lo, hi);
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = eval(c);
    let mut fd = eval(d);

    for _ in 0..GOLDEN_MAX_ITERATIONS {
        if (b - a).abs() <= tolerance {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = eval(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = eval(d);
        }
    }

    let mid = 0.5 * (a + b);
    let fmid = eval(mid);
    let best = [(mid, fmid), (c, fc), (d, fd)]
        .into_iter()
        .min_by(|l, r| l.1.total_cmp(&r.1))?;
    (best.1 < f32::MAX).then_some(best)
}

/// Minimizes `f` over the plane by Nelder-Mead, starting from `start` with an
/// initial simplex of edge `step`.
///
/// Stops once the simplex's value spread drops below `tolerance` or after
/// `max_iterations`. Always returns the best vertex found.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use scrimmage_core::optimize::nelder_mead;
///
/// let target = Vec2::new(3.0, -2.0);
/// let (best, _) = nelder_mead(|p| p.distance_squared(target), Vec2::ZERO, 1.0, 1e-8, 200);
/// assert!(best.distance(target) < 1e-2);
/// ```
pub fn nelder_mead<F>(f: F, start: Vec2, step: f32, tolerance: f32, max_iterations: u32) -> (Vec2, f32)
where
    F: Fn(Vec2) -> f32,
{
    let eval = |p: Vec2| finite_or_max(f(p));

    let mut simplex = [
        (start, eval(start)),
        (start + Vec2::new(step, 0.0), 0.0),
        (start + Vec2::new(0.0, step), 0.0),
    ];
    simplex[1].1 = eval(simplex[1].0);
    simplex[2].1 = eval(simplex[2].0);

    for _ in 0..max_iterations {
        simplex.sort_by(|l, r| l.1.total_cmp(&r.1));
        let [best, good, worst] = simplex;
        if (worst.1 - best.1).abs() <= tolerance {
            break;
        }

        let centroid = (best.0 + good.0) * 0.5;
        let reflected = centroid + (centroid - worst.0);
        let f_reflected = eval(reflected);

        if f_reflected < best.1 {
            let expanded = centroid + (reflected - centroid) * 2.0;
            let f_expanded = eval(expanded);
            simplex[2] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < good.1 {
            simplex[2] = (reflected, f_reflected);
        } else {
            let contracted = if f_reflected < worst.1 {
                centroid + (reflected - centroid) * 0.5
            } else {
                centroid + (worst.0 - centroid) * 0.5
            };
            let f_contracted = eval(contracted);
            if f_contracted < worst.1.min(f_reflected) {
                simplex[2] = (contracted, f_contracted);
            } else {
                // shrink towards the best vertex
                for vertex in simplex.iter_mut().skip(1) {
                    let p = best.0 + (vertex.0 - best.0) * 0.5;
                    *vertex = (p, eval(p));
                }
            }
        }
    }

    simplex
        .into_iter()
        .min_by(|l, r| l.1.total_cmp(&r.1))
        .unwrap_or((start, eval(start)))
}
