// Robot domain model - pose, heading sectors and the bounded trail
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_TRAIL_LIMIT: usize = 200;

/// Position in world units plus heading in degrees, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub angle_deg: f64,
}

impl Pose {
    pub fn origin() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            angle_deg: 0.0,
        }
    }

    pub fn point(&self) -> TrailPoint {
        TrailPoint::new(self.x, self.y)
    }

    pub fn facing(&self) -> Facing {
        Facing::from_angle(self.angle_deg)
    }

    /// Human readable position line shown under the map.
    pub fn readout(&self) -> String {
        format!(
            "Position: ({:.2}, {:.2}) | Facing: {} ({:.0}°)",
            self.x,
            self.y,
            self.facing(),
            self.angle_deg
        )
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::origin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
}

impl TrailPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Compass sector of a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Facing {
    N,
    E,
    S,
    W,
}

impl Facing {
    /// Half-open sectors: [315, 45) N, [45, 135) E, [135, 225) S, [225, 315) W.
    pub fn from_angle(angle_deg: f64) -> Self {
        let a = angle_deg.rem_euclid(360.0);
        if a >= 315.0 || a < 45.0 {
            Facing::N
        } else if a < 135.0 {
            Facing::E
        } else if a < 225.0 {
            Facing::S
        } else {
            Facing::W
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Facing::N => "N",
            Facing::E => "E",
            Facing::S => "S",
            Facing::W => "W",
        };
        f.write_str(label)
    }
}

/// Rounds to 4 decimal places so repeated moves don't accumulate float drift.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Wraps any heading into [0, 360).
pub fn wrap_degrees(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Parses a trail limit typed by the user. Unparsable or zero input falls back.
pub fn parse_trail_limit(input: &str, fallback: usize) -> usize {
    let parsed = input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0);

    match parsed {
        Some(v) if v < 1.0 => 1,
        Some(v) => v.trunc() as usize,
        None => fallback.max(1),
    }
}

/// Oldest-first history of visited points, never longer than its limit.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    limit: usize,
}

impl Trail {
    pub fn new(limit: usize) -> Self {
        let mut points = VecDeque::new();
        points.push_back(TrailPoint::new(0.0, 0.0));
        let mut trail = Self {
            points,
            limit: limit.max(1),
        };
        trail.evict();
        trail
    }

    pub fn push(&mut self, point: TrailPoint) {
        self.points.push_back(point);
        self.evict();
    }

    /// Clamps to at least 1 and drops the oldest points that no longer fit.
    pub fn set_limit(&mut self, limit: usize) -> usize {
        self.limit = limit.max(1);
        self.evict();
        self.limit
    }

    /// Back to a single point at the origin.
    pub fn reset(&mut self) {
        self.points.clear();
        self.points.push_back(TrailPoint::new(0.0, 0.0));
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }

    fn evict(&mut self) {
        while self.points.len() > self.limit {
            self.points.pop_front();
        }
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_sectors() {
        assert_eq!(Facing::from_angle(0.0), Facing::N);
        assert_eq!(Facing::from_angle(44.999), Facing::N);
        assert_eq!(Facing::from_angle(45.0), Facing::E);
        assert_eq!(Facing::from_angle(134.9), Facing::E);
        assert_eq!(Facing::from_angle(135.0), Facing::S);
        assert_eq!(Facing::from_angle(225.0), Facing::W);
        assert_eq!(Facing::from_angle(314.99), Facing::W);
        assert_eq!(Facing::from_angle(315.0), Facing::N);
        assert_eq!(Facing::from_angle(359.999), Facing::N);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-15.0), 345.0);
        assert_eq!(wrap_degrees(-735.0), 345.0);
        let tiny = wrap_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.000049), 1.0);
        assert_eq!(round4(6.123233995736766e-17), 0.0);
        assert_eq!(round4(-0.70710678), -0.7071);
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::new(3);
        for i in 1..=4 {
            trail.push(TrailPoint::new(i as f64, 0.0));
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.iter().next(), Some(&TrailPoint::new(2.0, 0.0)));
    }

    #[test]
    fn test_trail_shrinking_limit_drops_front() {
        let mut trail = Trail::new(10);
        for i in 1..=5 {
            trail.push(TrailPoint::new(0.0, i as f64));
        }
        assert_eq!(trail.set_limit(2), 2);
        assert_eq!(
            trail.to_vec(),
            vec![TrailPoint::new(0.0, 4.0), TrailPoint::new(0.0, 5.0)]
        );
        assert_eq!(trail.set_limit(0), 1);
        assert_eq!(trail.to_vec(), vec![TrailPoint::new(0.0, 5.0)]);
    }

    #[test]
    fn test_parse_trail_limit() {
        assert_eq!(parse_trail_limit("50", 200), 50);
        assert_eq!(parse_trail_limit(" 12.7 ", 200), 12);
        assert_eq!(parse_trail_limit("abc", 200), 200);
        assert_eq!(parse_trail_limit("0", 200), 200);
        assert_eq!(parse_trail_limit("-4", 200), 1);
    }

    #[test]
    fn test_readout() {
        let pose = Pose {
            x: 2.0,
            y: -1.23456,
            angle_deg: 90.0,
        };
        assert_eq!(pose.readout(), "Position: (2.00, -1.23) | Facing: E (90°)");
    }
}
