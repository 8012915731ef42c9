use rand::Rng;
use serde::{Deserialize, Serialize};

/// Basic two dimensional point used for geometry operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Discrete stage of one interaction round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Sliding,
    Success,
}

/// Reference right triangle with the right angle at `b` and hypotenuse `a`-`c`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

/// Inclusive sampling range for the hypotenuse length.
pub const LENGTH_MIN: u32 = 150;
pub const LENGTH_MAX: u32 = 250;
/// Inclusive sampling range for the acute angle at `A`, in degrees.
pub const TRUE_ANGLE_MIN: u32 = 20;
pub const TRUE_ANGLE_MAX: u32 = 70;
/// Hard bounds of the user angle slider, in degrees.
pub const ANGLE_SLIDER_MIN: f64 = 1.0;
pub const ANGLE_SLIDER_MAX: f64 = 89.0;
/// Angle handed to the user when the hypotenuse is first selected.
pub const START_ANGLE: f64 = 45.0;
/// Neutral offset the `E` slider returns to at round start.
pub const DEFAULT_OFFSET: f64 = 50.0;
/// Goal tolerances: vertical distance of `F` from the axis, and angle error.
pub const POSITION_TOLERANCE: f64 = 1.5;
pub const ANGLE_TOLERANCE: f64 = 1.0;

/// Fixed anchor of the right-angle vertex `B` in reference-panel coordinates.
const ANCHOR: Point = Point { x: 280.0, y: 280.0 };

/// Offset of a segment of `length` leaving a pivot at `angle_deg` from the
/// vertical axis, with the pivot sitting `pivot` above the origin.
/// Coordinates are SVG-style (y grows downward).
pub fn project(length: f64, angle_deg: f64, pivot: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point {
        x: -length * rad.sin(),
        y: pivot - length * rad.cos(),
    }
}

/// Three-point L marker for a right angle between two arms meeting at
/// `vertex`. Empty when either arm is degenerate.
pub fn corner_path(vertex: Point, arm_a: Point, arm_b: Point, radius: f64) -> Vec<Point> {
    let va = (arm_a.x - vertex.x, arm_a.y - vertex.y);
    let vb = (arm_b.x - vertex.x, arm_b.y - vertex.y);
    let ma = va.0.hypot(va.1);
    let mb = vb.0.hypot(vb.1);
    if ma == 0.0 || mb == 0.0 {
        return Vec::new();
    }
    let ua = (va.0 / ma, va.1 / ma);
    let ub = (vb.0 / mb, vb.1 / mb);
    vec![
        Point {
            x: vertex.x + ua.0 * radius,
            y: vertex.y + ua.1 * radius,
        },
        Point {
            x: vertex.x + (ua.0 + ub.0) * radius,
            y: vertex.y + (ua.1 + ub.1) * radius,
        },
        Point {
            x: vertex.x + ub.0 * radius,
            y: vertex.y + ub.1 * radius,
        },
    ]
}

/// Sampled circular arc swept from the `arm_a` direction to the `arm_b`
/// direction around `vertex`. Empty when either arm is degenerate.
pub fn arc_path(vertex: Point, arm_a: Point, arm_b: Point, radius: f64) -> Vec<Point> {
    let va = (arm_a.x - vertex.x, arm_a.y - vertex.y);
    let vb = (arm_b.x - vertex.x, arm_b.y - vertex.y);
    if va.0.hypot(va.1) == 0.0 || vb.0.hypot(vb.1) == 0.0 {
        return Vec::new();
    }
    let start = va.1.atan2(va.0);
    let end = vb.1.atan2(vb.0);
    let mut sweep = end - start;
    if sweep < 0.0 {
        sweep += 2.0 * std::f64::consts::PI;
    }
    let k = 16;
    let mut pts = Vec::with_capacity(k + 1);
    for i in 0..=k {
        let a = start + sweep * (i as f64) / (k as f64);
        pts.push(Point {
            x: vertex.x + radius * a.cos(),
            y: vertex.y + radius * a.sin(),
        });
    }
    pts
}

/// Read-only view of the session handed to the presentation layer each
/// update cycle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub triangle: Triangle,
    pub length: f64,
    pub angle: f64,
    pub true_angle: f64,
    pub offset: f64,
    pub point: Point,
    pub offset_max: f64,
}

/// One puzzle round: the generated reference triangle plus the
/// user-controlled construction state. All transitions are synchronous;
/// derived values are recomputed from scratch on every read so they can
/// never drift from the stored fields.
#[derive(Clone, Debug)]
pub struct Session {
    phase: Phase,
    triangle: Triangle,
    true_length: f64,
    true_angle: f64,
    length: f64,
    angle: f64,
    offset: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            phase: Phase::Idle,
            triangle: Triangle::default(),
            true_length: 0.0,
            true_angle: 0.0,
            length: 0.0,
            angle: 0.0,
            offset: DEFAULT_OFFSET,
        }
    }

    /// Start a fresh round with random parameters. Valid in any phase;
    /// this is both initial setup and the explicit reset.
    pub fn generate_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let length = rng.random_range(LENGTH_MIN..=LENGTH_MAX);
        let angle = rng.random_range(TRUE_ANGLE_MIN..=TRUE_ANGLE_MAX);
        self.start_round(f64::from(length), f64::from(angle));
    }

    /// Start a round with explicit parameters (scripted or seeded rounds).
    pub fn start_round(&mut self, true_length: f64, true_angle: f64) {
        let rad = true_angle.to_radians();
        let side_ab = true_length * rad.cos();
        let side_bc = true_length * rad.sin();

        self.true_length = true_length;
        self.true_angle = true_angle;
        self.triangle = Triangle {
            a: Point {
                x: ANCHOR.x,
                y: ANCHOR.y - side_ab,
            },
            b: ANCHOR,
            c: Point {
                x: ANCHOR.x - side_bc,
                y: ANCHOR.y,
            },
        };
        self.phase = Phase::Idle;
        self.length = 0.0;
        self.angle = 0.0;
        self.offset = DEFAULT_OFFSET;
    }

    /// Pick up the hypotenuse: reveals its length to the construction side
    /// and opens the sliders. Ignored outside `Idle`.
    pub fn select_hypotenuse(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.length = self.true_length;
        self.angle = START_ANGLE;
        self.phase = Phase::Sliding;
    }

    /// Move the `E` slider. Ignored in `Idle`; editing after success
    /// re-opens the round.
    pub fn set_offset(&mut self, value: f64) {
        if self.phase == Phase::Idle {
            return;
        }
        self.phase = Phase::Sliding;
        self.offset = value;
        self.check_goal();
    }

    /// Move the angle slider. Same gating as `set_offset`.
    pub fn set_angle(&mut self, value: f64) {
        if self.phase == Phase::Idle {
            return;
        }
        self.phase = Phase::Sliding;
        self.angle = value;
        self.check_goal();
    }

    fn check_goal(&mut self) {
        let f = self.derived_point();
        if f.y.abs() <= POSITION_TOLERANCE
            && (self.angle - self.true_angle).abs() <= ANGLE_TOLERANCE
        {
            // Snap to the exact solution so no residual float error is
            // left on screen.
            self.offset = self.target_offset();
            self.angle = self.true_angle;
            self.phase = Phase::Success;
        }
    }

    /// Position of `F` relative to the construction origin `D`.
    pub fn derived_point(&self) -> Point {
        if self.length == 0.0 {
            return Point::default();
        }
        project(self.length, self.angle, self.offset)
    }

    /// Upper bound of the `E` slider, wide enough that the target offset is
    /// always reachable.
    pub fn offset_max(&self) -> f64 {
        if self.length == 0.0 {
            return 200.0;
        }
        let rad = if self.true_angle == 0.0 {
            START_ANGLE
        } else {
            self.true_angle
        }
        .to_radians();
        let target = self.length * rad.cos();
        (target * 1.5).max(self.length).max(100.0)
    }

    /// Offset at which `F` lands exactly on the horizontal axis when the
    /// angle is correct.
    pub fn target_offset(&self) -> f64 {
        self.length * self.true_angle.to_radians().cos()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn triangle(&self) -> Triangle {
        self.triangle
    }
    pub fn true_length(&self) -> f64 {
        self.true_length
    }
    pub fn true_angle(&self) -> f64 {
        self.true_angle
    }
    pub fn length(&self) -> f64 {
        self.length
    }
    pub fn angle(&self) -> f64 {
        self.angle
    }
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            triangle: self.triangle,
            length: self.length,
            angle: self.angle,
            true_angle: self.true_angle,
            offset: self.offset,
            point: self.derived_point(),
            offset_max: self.offset_max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn dist(a: Point, b: Point) -> f64 {
        (a.x - b.x).hypot(a.y - b.y)
    }

    #[test]
    fn generated_rounds_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut s = Session::new();
        for _ in 0..200 {
            s.generate_round(&mut rng);
            assert!((150.0..=250.0).contains(&s.true_length()));
            assert!((20.0..=70.0).contains(&s.true_angle()));
            assert_eq!(s.true_length().fract(), 0.0);
            assert_eq!(s.true_angle().fract(), 0.0);
        }
    }

    #[test]
    fn generated_triangle_matches_parameters() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = Session::new();
        for _ in 0..200 {
            s.generate_round(&mut rng);
            let t = s.triangle();
            assert!((dist(t.a, t.c) - s.true_length()).abs() < 1e-6);
            // Legs are axis aligned, so the right angle at B is exact.
            assert_eq!(t.a.x, t.b.x);
            assert_eq!(t.c.y, t.b.y);
        }
    }

    #[test]
    fn reset_is_idempotent_from_any_phase() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut s = Session::new();
        s.generate_round(&mut rng);
        s.select_hypotenuse();
        s.set_angle(33.0);
        s.generate_round(&mut rng);
        s.generate_round(&mut rng);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.length(), 0.0);
        assert_eq!(s.angle(), 0.0);
        assert_eq!(s.offset(), DEFAULT_OFFSET);
    }

    #[test]
    fn sliders_are_ignored_while_idle() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.set_offset(120.0);
        s.set_angle(30.0);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.length(), 0.0);
        assert_eq!(s.angle(), 0.0);
        assert_eq!(s.offset(), DEFAULT_OFFSET);
    }

    #[test]
    fn select_is_ignored_outside_idle() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        s.set_angle(60.0);
        s.select_hypotenuse();
        assert_eq!(s.angle(), 60.0);
        assert_eq!(s.phase(), Phase::Sliding);
    }

    #[test]
    fn target_is_always_inside_slider_range() {
        let mut s = Session::new();
        for length in 150..=250 {
            for angle in 20..=70 {
                s.start_round(f64::from(length), f64::from(angle));
                s.select_hypotenuse();
                assert!(
                    s.offset_max() >= s.target_offset(),
                    "target unreachable for L={length} angle={angle}"
                );
                assert!((ANGLE_SLIDER_MIN..=ANGLE_SLIDER_MAX).contains(&s.true_angle()));
            }
        }
    }

    #[test]
    fn scripted_round_end_to_end() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        assert_eq!(s.length(), 200.0);
        assert_eq!(s.angle(), START_ANGLE);
        assert_eq!(s.phase(), Phase::Sliding);

        s.set_angle(30.0);
        assert_eq!(s.phase(), Phase::Sliding);
        s.set_offset(200.0 * 30f64.to_radians().cos());
        assert_eq!(s.phase(), Phase::Success);
        // Snapped to the exact formula values, not the raw slider input.
        assert_eq!(s.offset(), 200.0 * 30f64.to_radians().cos());
        assert_eq!(s.angle(), 30.0);
    }

    #[test]
    fn success_snaps_tolerant_input_to_exact_values() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        s.set_angle(29.5);
        s.set_offset(200.0 * 29.5f64.to_radians().cos());
        assert_eq!(s.phase(), Phase::Success);
        assert_eq!(s.angle(), 30.0);
        assert_eq!(s.offset(), s.target_offset());
    }

    #[test]
    fn angle_tolerance_boundary() {
        // Diff of exactly 1.0 degree passes.
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        s.set_angle(29.0);
        s.set_offset(200.0 * 29f64.to_radians().cos());
        assert_eq!(s.phase(), Phase::Success);

        // Diff of 1.1 degrees does not, even with F on the axis.
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        s.set_angle(28.9);
        s.set_offset(200.0 * 28.9f64.to_radians().cos());
        assert_eq!(s.phase(), Phase::Sliding);
    }

    #[test]
    fn editing_after_success_reopens_the_round() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        s.set_angle(30.0);
        s.set_offset(s.target_offset());
        assert_eq!(s.phase(), Phase::Success);

        s.set_angle(40.0);
        assert_eq!(s.phase(), Phase::Sliding);
        assert_eq!(s.angle(), 40.0);
    }

    #[test]
    fn nudge_within_tolerance_re_succeeds_immediately() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        s.set_angle(30.0);
        s.set_offset(s.target_offset());
        assert_eq!(s.phase(), Phase::Success);

        s.set_offset(s.target_offset() + 1.0);
        assert_eq!(s.phase(), Phase::Success);
        assert_eq!(s.offset(), s.target_offset());
    }

    #[test]
    fn derived_point_lands_on_axis_at_target() {
        let mut s = Session::new();
        for angle in 20..=70 {
            s.start_round(180.0, f64::from(angle));
            s.select_hypotenuse();
            s.set_angle(f64::from(angle));
            s.set_offset(s.target_offset());
            assert!(s.derived_point().y.abs() < 1e-9);
        }
    }

    #[test]
    fn projection_formula() {
        let p = project(100.0, 0.0, 50.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y + 50.0).abs() < 1e-12);

        let p = project(100.0, 90.0, 0.0);
        assert!((p.x + 100.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn marker_paths_are_empty_for_degenerate_arms() {
        let v = Point { x: 10.0, y: 10.0 };
        let arm = Point { x: 20.0, y: 10.0 };
        assert!(corner_path(v, v, arm, 15.0).is_empty());
        assert!(corner_path(v, arm, v, 15.0).is_empty());
        assert!(arc_path(v, v, arm, 25.0).is_empty());
        assert_eq!(corner_path(v, arm, Point { x: 10.0, y: 20.0 }, 15.0).len(), 3);
    }

    #[test]
    fn arc_points_sit_on_the_radius() {
        let v = Point { x: 0.0, y: 0.0 };
        let pts = arc_path(
            v,
            Point { x: 30.0, y: 0.0 },
            Point { x: 0.0, y: 30.0 },
            25.0,
        );
        assert!(!pts.is_empty());
        for p in pts {
            assert!((dist(p, v) - 25.0).abs() < 1e-9);
        }
    }

    #[test]
    fn snapshot_reflects_session() {
        let mut s = Session::new();
        s.start_round(200.0, 30.0);
        s.select_hypotenuse();
        let snap = s.snapshot();
        assert_eq!(snap.phase, Phase::Sliding);
        assert_eq!(snap.length, 200.0);
        assert_eq!(snap.angle, START_ANGLE);
        assert_eq!(snap.true_angle, 30.0);
        assert_eq!(snap.offset, DEFAULT_OFFSET);
        assert_eq!(snap.point, s.derived_point());
        assert_eq!(snap.offset_max, s.offset_max());
    }
}
