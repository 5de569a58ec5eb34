use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat3, Quat, Vec3};

use crate::config::{BoxConfig, TubeConfig};
use crate::math::{hsv_to_rgb, SplitMix64};
use crate::spline::CurvePath;
use crate::types::LineVertex;

const TUBE_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// All line-list vertices for one frame, tube first, boxes after.
pub struct SceneGeometry {
    pub vertices: Vec<LineVertex>,
}

impl SceneGeometry {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Orientation frames swept along the closed loop, one per ring plus a
/// wrapped copy at the end. Parallel transport keeps consecutive rings from
/// twisting against each other; the final pass spreads the seam mismatch
/// over the whole loop so ring 0 meets the last ring cleanly.
struct PathFrames {
    origins: Vec<Vec3>,
    normals: Vec<Vec3>,
    binormals: Vec<Vec3>,
}

fn transport_frames(path: &CurvePath, segments: u32) -> PathFrames {
    let count = segments as usize + 1;
    let mut origins = Vec::with_capacity(count);
    let mut tangents = Vec::with_capacity(count);
    for i in 0..count {
        let u = i as f32 / segments as f32;
        origins.push(path.point_at(u));
        tangents.push(path.tangent_at(u));
    }

    // Initial normal: perpendicular to the first tangent, seeded from the
    // axis the tangent points along least.
    let t0 = tangents[0];
    let abs = t0.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let side = t0.cross(axis).normalize_or_zero();
    let mut normals = vec![Vec3::ZERO; count];
    let mut binormals = vec![Vec3::ZERO; count];
    normals[0] = t0.cross(side).normalize_or_zero();
    binormals[0] = t0.cross(normals[0]);

    for i in 1..count {
        normals[i] = normals[i - 1];
        let rotation_axis = tangents[i - 1].cross(tangents[i]);
        if rotation_axis.length() > 1e-6 {
            let angle = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normals[i] = Quat::from_axis_angle(rotation_axis.normalize(), angle) * normals[i];
        }
        binormals[i] = tangents[i].cross(normals[i]);
    }

    // Closed loop: distribute the residual twist between the first and the
    // wrapped last frame evenly across every ring.
    let mut twist = normals[0].dot(normals[segments as usize]).clamp(-1.0, 1.0).acos();
    twist /= segments as f32;
    if tangents[0].dot(normals[0].cross(normals[segments as usize])) > 0.0 {
        twist = -twist;
    }
    for i in 1..count {
        normals[i] = Quat::from_axis_angle(tangents[i], twist * i as f32) * normals[i];
        binormals[i] = tangents[i].cross(normals[i]);
    }

    PathFrames {
        origins,
        normals,
        binormals,
    }
}

/// Wireframe of the closed tube: one ring per tubular segment, each ring a
/// polygon of radial edges, plus longitudinal edges joining neighbouring
/// rings. Rendered as a line list in a single color.
pub fn tube_wireframe(path: &CurvePath, config: &TubeConfig) -> Vec<LineVertex> {
    let segments = config.tubular_segments as usize;
    let radial = config.radial_segments as usize;
    let frames = transport_frames(path, config.tubular_segments);

    let mut rings = Vec::with_capacity(segments);
    for i in 0..segments {
        let mut ring = Vec::with_capacity(radial);
        for j in 0..radial {
            let phi = j as f32 / radial as f32 * TAU;
            let offset = frames.normals[i] * phi.cos() + frames.binormals[i] * phi.sin();
            ring.push(frames.origins[i] + offset * config.radius);
        }
        rings.push(ring);
    }

    let mut vertices = Vec::with_capacity(segments * radial * 4);
    let mut push_edge = |a: Vec3, b: Vec3| {
        vertices.push(LineVertex {
            position: a.to_array(),
            color: TUBE_COLOR,
        });
        vertices.push(LineVertex {
            position: b.to_array(),
            color: TUBE_COLOR,
        });
    };
    for i in 0..segments {
        let next_ring = (i + 1) % segments;
        for j in 0..radial {
            let next = (j + 1) % radial;
            push_edge(rings[i][j], rings[i][next]);
            push_edge(rings[i][j], rings[next_ring][j]);
        }
    }
    vertices
}

/// Scatters rotated wireframe cubes along the loop. Each cube sits near an
/// evenly spaced progress value with a little forward jitter, drifts off the
/// path in x and z, and takes its hue from how far along the loop it sits.
pub fn box_wireframes(path: &CurvePath, config: &BoxConfig) -> Vec<LineVertex> {
    let mut rng = SplitMix64::new(config.seed);
    let half = config.size * 0.5;
    let corners = [
        Vec3::new(-half, -half, -half),
        Vec3::new(half, -half, -half),
        Vec3::new(half, half, -half),
        Vec3::new(-half, half, -half),
        Vec3::new(-half, -half, half),
        Vec3::new(half, -half, half),
        Vec3::new(half, half, half),
        Vec3::new(-half, half, half),
    ];

    let mut vertices = Vec::with_capacity(config.count as usize * CUBE_EDGES.len() * 2);
    for i in 0..config.count {
        let p = (i as f32 / config.count as f32 + rng.next_range(config.scatter)).rem_euclid(1.0);
        let mut center = path.point_at(p);
        center.x += rng.next_f32() - 0.4;
        center.z += rng.next_f32() - 0.4;
        let rotation = Mat3::from_euler(
            EulerRot::XYZ,
            rng.next_range(PI),
            rng.next_range(PI),
            rng.next_range(PI),
        );
        let color = hsv_to_rgb(0.7 - p, 1.0, 1.0);

        for (a, b) in CUBE_EDGES {
            vertices.push(LineVertex {
                position: (center + rotation * corners[a]).to_array(),
                color,
            });
            vertices.push(LineVertex {
                position: (center + rotation * corners[b]).to_array(),
                color,
            });
        }
    }
    vertices
}

pub fn build_scene(path: &CurvePath, tube: &TubeConfig, boxes: &BoxConfig) -> SceneGeometry {
    let mut vertices = tube_wireframe(path, tube);
    vertices.extend(box_wireframes(path, boxes));
    log::info!("Scene built: {} line vertices", vertices.len());
    SceneGeometry { vertices }
}
