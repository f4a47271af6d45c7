// SVG drawing surface - renders the robot map as a standalone SVG document
use crate::application::map_renderer::{DrawingSurface, SurfaceSize};
use std::fmt::Write;

const MIN_WIDTH: f64 = 200.0;
const MIN_HEIGHT: f64 = 120.0;

#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: SurfaceSize,
    elements: Vec<String>,
    transform: Vec<String>,
    saved: Vec<Vec<String>>,
}

impl SvgSurface {
    /// `width`/`height` are CSS pixels; the surface itself is in device pixels.
    pub fn new(width: f64, height: f64, pixel_density: f64) -> Self {
        let mut surface = Self {
            size: SurfaceSize {
                width: 0.0,
                height: 0.0,
                pixel_density: 1.0,
            },
            elements: Vec::new(),
            transform: Vec::new(),
            saved: Vec::new(),
        };
        surface.resize(width, height, pixel_density);
        surface
    }

    pub fn resize(&mut self, width: f64, height: f64, pixel_density: f64) {
        let dpr = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };
        let clamp = |v: f64, min: f64| if v.is_finite() { v.max(min) } else { min };
        self.size = SurfaceSize {
            width: clamp(width, MIN_WIDTH) * dpr,
            height: clamp(height, MIN_HEIGHT) * dpr,
            pixel_density: dpr,
        };
    }

    /// CSS width, CSS height and pixel density, as last passed to `resize`.
    pub fn css_size(&self) -> (f64, f64, f64) {
        let SurfaceSize {
            width,
            height,
            pixel_density,
        } = self.size;
        (width / pixel_density, height / pixel_density, pixel_density)
    }

    pub fn document(&self) -> String {
        let SurfaceSize { width, height, .. } = self.size;
        let mut doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        for element in &self.elements {
            doc.push_str(element);
        }
        doc.push_str("</svg>");
        doc
    }

    fn transform_attr(&self) -> String {
        if self.transform.is_empty() {
            String::new()
        } else {
            format!(r#" transform="{}""#, self.transform.join(" "))
        }
    }

    fn points_attr(points: &[(f64, f64)]) -> String {
        let mut out = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{:.2},{:.2}", x, y);
        }
        out
    }
}

impl DrawingSurface for SvgSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.transform.clear();
        self.saved.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        let element = format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
            x,
            y,
            width,
            height,
            color,
            self.transform_attr()
        );
        self.elements.push(element);
    }

    fn stroke_segments(&mut self, segments: &[[(f64, f64); 2]], color: &str, line_width: f64) {
        if segments.is_empty() {
            return;
        }
        let mut d = String::new();
        for [(x1, y1), (x2, y2)] in segments {
            let _ = write!(d, "M{:.2} {:.2}L{:.2} {:.2}", x1, y1, x2, y2);
        }
        let element = format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            d,
            color,
            line_width,
            self.transform_attr()
        );
        self.elements.push(element);
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, line_width: f64) {
        let element = format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"{}/>"#,
            Self::points_attr(points),
            color,
            line_width,
            self.transform_attr()
        );
        self.elements.push(element);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
        let element = format!(
            r#"<polygon points="{}" fill="{}"{}/>"#,
            Self::points_attr(points),
            color,
            self.transform_attr()
        );
        self.elements.push(element);
    }

    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: &str) {
        let element = format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"{}/>"#,
            center.0,
            center.1,
            radius,
            color,
            self.transform_attr()
        );
        self.elements.push(element);
    }

    fn save(&mut self) {
        self.saved.push(self.transform.clone());
    }

    fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.transform = previous;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.push(format!("translate({:.2} {:.2})", dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        // SVG rotates clockwise in degrees, same sense as the canvas
        self.transform.push(format!("rotate({:.2})", radians.to_degrees()));
    }
}
