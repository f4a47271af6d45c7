// Map renderer - projects the pose and trail onto a drawing surface
use crate::domain::robot::{Pose, Trail, TrailPoint};

const MARGIN_PX: f64 = 20.0;
const MIN_SCALE: f64 = 6.0;
const FALLBACK_SCALE: f64 = 20.0;
const DOT_RADIUS_PX: f64 = 3.0;
const GLYPH_SIZE_PX: f64 = 10.0;
const MAX_GRID_LINES: f64 = 200.0;

const BACKGROUND_COLOR: &str = "rgba(255,255,255,0.02)";
const GRID_COLOR: &str = "rgba(255,255,255,0.03)";
const TRAIL_COLOR: &str = "#3b82f6";
const DOT_COLOR: &str = "rgba(59,130,246,0.9)";
const ROBOT_COLOR: &str = "#f87171";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Device pixels.
    pub width: f64,
    pub height: f64,
    pub pixel_density: f64,
}

/// 2-D paint target. Coordinates are device pixels, y grows downward.
pub trait DrawingSurface {
    fn size(&self) -> SurfaceSize;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn stroke_segments(&mut self, segments: &[[(f64, f64); 2]], color: &str, line_width: f64);
    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, line_width: f64);
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str);
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: &str);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    /// Clockwise on screen.
    fn rotate(&mut self, radians: f64);
}

/// World bounds and scale chosen for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub scale: f64,
    pub margin: f64,
    pub width: f64,
    pub height: f64,
}

impl MapProjection {
    /// World units to device pixels, flipping y so north is up.
    pub fn to_pixel(&self, point: TrailPoint) -> (f64, f64) {
        let px = self.margin + (point.x - self.min_x) * self.scale;
        let py = self.height - (self.margin + (point.y - self.min_y) * self.scale);
        (px, py)
    }
}

pub struct MapRenderer;

impl MapRenderer {
    /// Fits `trail` plus the current pose into the surface, keeping aspect ratio.
    pub fn project(pose: &Pose, trail: &Trail, size: SurfaceSize) -> MapProjection {
        let current = pose.point();
        let (mut min_x, mut max_x, mut min_y, mut max_y) = trail
            .iter()
            .chain(std::iter::once(&current))
            .fold(
                (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
                |(lx, hx, ly, hy), p| (lx.min(p.x), hx.max(p.x), ly.min(p.y), hy.max(p.y)),
            );

        if min_x == max_x {
            min_x -= 1.0;
            max_x += 1.0;
        }
        if min_y == max_y {
            min_y -= 1.0;
            max_y += 1.0;
        }

        let margin = MARGIN_PX * size.pixel_density;
        let available_w = size.width - margin * 2.0;
        let available_h = size.height - margin * 2.0;
        let scale_x = available_w / (max_x - min_x);
        let scale_y = available_h / (max_y - min_y);
        let fitted = scale_x.min(scale_y);
        let fitted = if fitted.is_finite() && fitted != 0.0 {
            fitted
        } else {
            FALLBACK_SCALE
        };

        MapProjection {
            min_x,
            max_x,
            min_y,
            max_y,
            scale: fitted.max(MIN_SCALE),
            margin,
            width: size.width,
            height: size.height,
        }
    }

    /// Paints background, unit grid, trail polyline and dots, then the heading glyph.
    pub fn render<S: DrawingSurface + ?Sized>(
        pose: &Pose,
        trail: &Trail,
        surface: &mut S,
    ) -> MapProjection {
        let size = surface.size();
        let dpr = size.pixel_density;
        let projection = Self::project(pose, trail, size);
        let (w, h, margin) = (size.width, size.height, projection.margin);

        surface.clear();
        surface.fill_rect(0.0, 0.0, w, h, BACKGROUND_COLOR);

        let mut grid = Vec::new();
        for gx in grid_lines(projection.min_x, projection.max_x) {
            let (x, _) = projection.to_pixel(TrailPoint::new(gx, projection.min_y));
            grid.push([(x, margin), (x, h - margin)]);
        }
        for gy in grid_lines(projection.min_y, projection.max_y) {
            let (_, y) = projection.to_pixel(TrailPoint::new(projection.min_x, gy));
            grid.push([(margin, y), (w - margin, y)]);
        }
        surface.stroke_segments(&grid, GRID_COLOR, dpr);

        let current = projection.to_pixel(pose.point());
        if !trail.is_empty() {
            let mut path: Vec<(f64, f64)> =
                trail.iter().map(|p| projection.to_pixel(*p)).collect();
            path.push(current);
            surface.stroke_polyline(&path, TRAIL_COLOR, 2.0 * dpr);

            for p in trail.iter() {
                surface.fill_circle(projection.to_pixel(*p), DOT_RADIUS_PX * dpr, DOT_COLOR);
            }
        }

        let size_px = GLYPH_SIZE_PX * dpr;
        surface.save();
        surface.translate(current.0, current.1);
        surface.rotate(pose.angle_deg.to_radians());
        surface.fill_polygon(
            &[
                (0.0, -size_px),
                (size_px * 0.7, size_px),
                (-size_px * 0.7, size_px),
            ],
            ROBOT_COLOR,
        );
        surface.restore();

        projection
    }
}

/// World coordinates of grid lines in `[min, max]`: every unit, thinned to
/// whole multiples of a coarser step so a span never yields more than
/// `MAX_GRID_LINES` lines. Non-finite spans get no grid.
fn grid_lines(min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span < 0.0 {
        return Vec::new();
    }
    let step = if span > MAX_GRID_LINES {
        (span / MAX_GRID_LINES).ceil()
    } else {
        1.0
    };
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DrawCommand, RecordingSurface};

    #[test]
    fn test_single_point_is_padded() {
        let trail = Trail::new(200);
        let mut surface = RecordingSurface::new(400.0, 240.0, 1.0);
        let projection = MapRenderer::render(&Pose::origin(), &trail, &mut surface);

        assert_eq!(
            (projection.min_x, projection.max_x, projection.min_y, projection.max_y),
            (-1.0, 1.0, -1.0, 1.0)
        );
        // min((400-40)/2, (240-40)/2)
        assert_eq!(projection.scale, 100.0);
        assert!(projection.scale.is_finite());
    }

    #[test]
    fn test_projection_flips_y() {
        let mut trail = Trail::new(10);
        trail.push(TrailPoint::new(0.0, 4.0));
        let pose = Pose {
            x: 0.0,
            y: 4.0,
            angle_deg: 0.0,
        };
        let size = SurfaceSize {
            width: 200.0,
            height: 200.0,
            pixel_density: 1.0,
        };
        let projection = MapRenderer::project(&pose, &trail, size);

        let (_, origin_y) = projection.to_pixel(TrailPoint::new(0.0, 0.0));
        let (_, north_y) = projection.to_pixel(TrailPoint::new(0.0, 4.0));
        assert!(north_y < origin_y);
        assert_eq!(origin_y, 200.0 - 20.0);
    }

    #[test]
    fn test_scale_is_floored_for_large_trails() {
        let mut trail = Trail::new(10);
        trail.push(TrailPoint::new(1000.0, 1000.0));
        let pose = Pose {
            x: 1000.0,
            y: 1000.0,
            angle_deg: 0.0,
        };
        let size = SurfaceSize {
            width: 200.0,
            height: 120.0,
            pixel_density: 1.0,
        };
        assert_eq!(MapRenderer::project(&pose, &trail, size).scale, 6.0);
    }

    #[test]
    fn test_render_draws_trail_dots_and_glyph() {
        let mut trail = Trail::new(10);
        trail.push(TrailPoint::new(0.0, 1.0));
        trail.push(TrailPoint::new(1.0, 1.0));
        let pose = Pose {
            x: 1.0,
            y: 1.0,
            angle_deg: 90.0,
        };
        let mut surface = RecordingSurface::new(400.0, 400.0, 2.0);
        MapRenderer::render(&pose, &trail, &mut surface);

        let commands = surface.commands();
        assert_eq!(commands.first(), Some(&DrawCommand::Clear));

        let polyline = commands.iter().find_map(|c| match c {
            DrawCommand::Polyline { points, .. } => Some(points.len()),
            _ => None,
        });
        assert_eq!(polyline, Some(4));

        let dots = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == 6.0))
            .count();
        assert_eq!(dots, 3);

        let rotation = commands.iter().find_map(|c| match c {
            DrawCommand::Rotate(r) => Some(*r),
            _ => None,
        });
        assert_eq!(rotation, Some(90f64.to_radians()));
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_grid_is_thinned_for_huge_spans() {
        assert_eq!(grid_lines(-1.0, 1.0), vec![-1.0, 0.0, 1.0]);
        assert!(grid_lines(0.0, 1.0e9).len() <= MAX_GRID_LINES as usize + 1);
        assert!(grid_lines(0.0, f64::INFINITY).is_empty());

        let mut trail = Trail::new(10);
        trail.push(TrailPoint::new(5.0e6, -5.0e6));
        let pose = Pose {
            x: 5.0e6,
            y: -5.0e6,
            angle_deg: 0.0,
        };
        let mut surface = RecordingSurface::new(400.0, 240.0, 1.0);
        MapRenderer::render(&pose, &trail, &mut surface);

        let segments = surface.commands().iter().find_map(|c| match c {
            DrawCommand::Segments(n) => Some(*n),
            _ => None,
        });
        assert!(segments.is_some_and(|n| n > 0 && n <= 2 * (MAX_GRID_LINES as usize + 1)));
    }
}
