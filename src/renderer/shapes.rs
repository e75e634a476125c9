//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in arena pixel coordinates.

use glam::{Mat2, Vec2};
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Generate vertices for a filled, rotated ellipse
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let rot = Mat2::from_angle(rotation);
    let point = |i: u32| {
        let theta = (i as f32 / segments as f32) * TAU;
        center + rot * Vec2::new(radii.x * theta.cos(), radii.y * theta.sin())
    };

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(point(i), color));
        vertices.push(Vertex::at(point(i + 1), color));
    }

    vertices
}

/// Single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![Vertex::at(a, color), Vertex::at(b, color), Vertex::at(c, color)]
}

/// Quad from four corners in winding order
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]
}

/// Rotated rectangle centered on `center`
pub fn rect(center: Vec2, size: Vec2, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Mat2::from_angle(rotation);
    let h = size / 2.0;
    let corner = |x: f32, y: f32| center + rot * Vec2::new(x, y);
    quad(
        corner(-h.x, -h.y),
        corner(h.x, -h.y),
        corner(h.x, h.y),
        corner(-h.x, h.y),
        color,
    )
    .to_vec()
}

/// Thick polyline with butt caps
pub fn stroke(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);
    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = dir.perp() * half;
        vertices.extend(quad(p1 + perp, p2 + perp, p2 - perp, p1 - perp, color));
    }

    vertices
}

/// Points along a quadratic Bézier curve
pub fn quadratic_points(p0: Vec2, control: Vec2, p1: Vec2, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let mt = 1.0 - t;
            p0 * (mt * mt) + control * (2.0 * mt * t) + p1 * (t * t)
        })
        .collect()
}

/// Filled heart of roughly `size` half-width, point facing down
pub fn heart(center: Vec2, size: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(8);
    let k = size / 16.0;
    let point = |i: u32| {
        let t = (i as f32 / segments as f32) * TAU;
        let x = 16.0 * t.sin().powi(3);
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        // Screen y points down
        center + Vec2::new(x, -y) * k
    };

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(point(i), color));
        vertices.push(Vertex::at(point(i + 1), color));
    }

    vertices
}

/// Segment count that keeps circles smooth at any size
pub fn segments_for(radius: f32) -> u32 {
    ((radius * PI / 3.0) as u32).clamp(12, 64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_on_radius() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        for tri in verts.chunks(3) {
            let edge = Vec2::from(tri[1].position);
            assert!((edge.distance(Vec2::new(10.0, 10.0)) - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rotated_ellipse() {
        let verts = ellipse(Vec2::ZERO, Vec2::new(4.0, 2.0), PI / 2.0, [1.0; 4], 4);
        // First edge point (theta = 0) is rotated from +x onto +y
        let first = Vec2::from(verts[1].position);
        assert!((first - Vec2::new(0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn test_stroke_width() {
        let verts = stroke(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], 4.0, [1.0; 4]);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.position[1].abs() - 2.0).abs() < 1e-5);
        }
        assert!(stroke(&[Vec2::ZERO], 4.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_quadratic_endpoints() {
        let pts = quadratic_points(Vec2::ZERO, Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0), 8);
        assert_eq!(pts.len(), 9);
        assert_eq!(pts[0], Vec2::ZERO);
        assert_eq!(pts[8], Vec2::new(10.0, 0.0));
        assert!(pts[4].y > 0.0);
    }

    #[test]
    fn test_heart_bounds() {
        let verts = heart(Vec2::ZERO, 16.0, [1.0; 4], 32);
        for v in &verts {
            let p = Vec2::from(v.position);
            assert!(p.x.abs() <= 16.0 + 1e-3);
            assert!(p.y.abs() <= 17.0 + 1e-3);
        }
    }
}
