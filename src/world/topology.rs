use glam::Vec2;

/// Axis-aligned rectangle treated as a torus: leaving one edge re-enters at the opposite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl WorldBounds {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Wrap a position into `[min, max)` on both axes.
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            wrap(position.x, self.min_x, self.max_x),
            wrap(position.y, self.min_y, self.max_y),
        )
    }

    /// Shortest signed offset from `from` to `to`, going around the torus when that is shorter.
    pub fn shortest_delta(&self, from: Vec2, to: Vec2) -> Vec2 {
        Vec2::new(
            shortest_delta(from.x, to.x, self.min_x, self.max_x),
            shortest_delta(from.y, to.y, self.min_y, self.max_y),
        )
    }

    /// Squared wrap-aware distance between two points.
    pub fn distance_squared(&self, a: Vec2, b: Vec2) -> f32 {
        self.shortest_delta(a, b).length_squared()
    }

    /// Linear interpolation inside the rectangle, `t` in `[0, 1]` per axis.
    pub fn lerp(&self, tx: f32, ty: f32) -> Vec2 {
        Vec2::new(
            self.min_x + self.width() * tx,
            self.min_y + self.height() * ty,
        )
    }

    /// Clamp a position into the rectangle shrunk by `inset` on every side.
    ///
    /// An inset larger than half the span leaves an inverted range; the upper edge then wins.
    pub fn clamp_inset(&self, position: Vec2, inset: f32) -> Vec2 {
        Vec2::new(
            clamp_between(position.x, self.min_x + inset, self.max_x - inset),
            clamp_between(position.y, self.min_y + inset, self.max_y - inset),
        )
    }
}

/// Map `v` into `[min, max)`. A non-positive span disables wrapping.
pub fn wrap(v: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= 0.0 {
        return v;
    }

    let mut t = (v - min).rem_euclid(span);
    // rem_euclid can round up to exactly `span` for tiny negative inputs
    if t >= span {
        t = 0.0;
    }

    let wrapped = min + t;
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

/// Signed `b - a` reduced into `(-span/2, span/2]`. A non-positive span returns the raw delta.
pub fn shortest_delta(a: f32, b: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    let raw = b - a;
    if span <= 0.0 {
        return raw;
    }

    let half = span * 0.5;
    let mut delta = raw % span;
    if delta > half {
        delta -= span;
    } else if delta <= -half {
        delta += span;
    }
    delta
}

/// Clamp without panicking on an inverted range.
pub fn clamp_between(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() <= epsilon
    }

    fn sample_values() -> Vec<f32> {
        let mut values = Vec::new();
        let mut v = -73.25_f32;
        while v < 73.25 {
            values.push(v);
            v += 0.7;
        }
        values.extend_from_slice(&[-10.0, 10.0, -30.0, 30.0, 0.0, -1e-7, 9.999_999, -10.000_001]);
        values
    }

    #[test]
    fn wrap_lands_inside_half_open_range() {
        for v in sample_values() {
            let w = wrap(v, -10.0, 10.0);
            assert!((-10.0..10.0).contains(&w), "wrap({v}) = {w}");
        }
    }

    #[test]
    fn wrap_maps_max_edge_to_min_edge() {
        assert_eq!(wrap(10.0, -10.0, 10.0), -10.0);
        assert_eq!(wrap(-10.0, -10.0, 10.0), -10.0);
        assert!(approx_eq(wrap(12.5, -10.0, 10.0), -7.5, 1e-5));
        assert!(approx_eq(wrap(-12.5, -10.0, 10.0), 7.5, 1e-5));
    }

    #[test]
    fn degenerate_span_disables_wrapping() {
        assert_eq!(wrap(42.0, 5.0, 5.0), 42.0);
        assert_eq!(wrap(-3.0, 5.0, 1.0), -3.0);
        assert_eq!(shortest_delta(1.0, 9.0, 5.0, 5.0), 8.0);
        assert_eq!(shortest_delta(9.0, 1.0, 5.0, 1.0), -8.0);
    }

    #[test]
    fn shortest_delta_is_at_most_half_span() {
        let values = sample_values();
        for &a in &values {
            for &b in values.iter().step_by(7) {
                let d = shortest_delta(a, b, -10.0, 10.0);
                assert!(d.abs() <= 10.0, "delta({a}, {b}) = {d}");
            }
        }
    }

    #[test]
    fn shortest_delta_lands_on_target_after_wrapping() {
        let values = sample_values();
        for &a in &values {
            for &b in values.iter().step_by(5) {
                let d = shortest_delta(a, b, -10.0, 10.0);
                let landed = wrap(a + d, -10.0, 10.0);
                let target = wrap(b, -10.0, 10.0);
                // compare on the ring so -10 and 9.99999 count as neighbours
                let gap = shortest_delta(landed, target, -10.0, 10.0);
                assert!(gap.abs() < 1e-3, "a={a} b={b} landed={landed} target={target}");
            }
        }
    }

    #[test]
    fn shortest_delta_goes_around_the_short_way() {
        assert!(approx_eq(shortest_delta(-9.0, 9.0, -10.0, 10.0), -2.0, 1e-5));
        assert!(approx_eq(shortest_delta(9.0, -9.0, -10.0, 10.0), 2.0, 1e-5));
        assert!(approx_eq(shortest_delta(0.0, 3.0, -10.0, 10.0), 3.0, 1e-5));
        // exactly half a span resolves to the positive side
        assert_eq!(shortest_delta(0.0, 10.0, -10.0, 10.0), 10.0);
        assert_eq!(shortest_delta(10.0, 0.0, -10.0, 10.0), 10.0);
    }

    #[test]
    fn bounds_distance_uses_the_wrapped_path() {
        let bounds = WorldBounds::new(-10.0, 10.0, -10.0, 10.0);
        let d2 = bounds.distance_squared(Vec2::new(-9.5, 0.0), Vec2::new(9.5, 0.0));
        assert!(approx_eq(d2, 1.0, 1e-4));
    }

    #[test]
    fn clamp_inset_keeps_points_off_the_border() {
        let bounds = WorldBounds::new(-10.0, 10.0, -10.0, 10.0);
        let p = bounds.clamp_inset(Vec2::new(-10.0, 12.0), 0.25);
        assert_eq!(p, Vec2::new(-9.75, 9.75));

        // inverted after inset: no panic, upper edge applied last
        let p = bounds.clamp_inset(Vec2::new(0.0, 0.0), 15.0);
        assert_eq!(p, Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn lerp_spans_a_non_square_rectangle() {
        let bounds = WorldBounds::new(-4.0, 6.0, 0.0, 2.0);
        assert_eq!(bounds.lerp(0.0, 0.0), Vec2::new(-4.0, 0.0));
        assert_eq!(bounds.lerp(0.5, 0.5), Vec2::new(1.0, 1.0));
        assert_eq!(bounds.lerp(1.0, 1.0), Vec2::new(6.0, 2.0));
    }
}
