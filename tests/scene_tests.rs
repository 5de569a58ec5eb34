use glam::Vec3;
use tunnel_flyer::config::{BoxConfig, TubeConfig};
use tunnel_flyer::scene::{box_wireframes, build_scene, tube_wireframe};
use tunnel_flyer::spline::{tunnel_control_points, CurvePath};

#[cfg(test)]
mod scene_tests {
    use super::*;

    fn test_path() -> CurvePath {
        CurvePath::new(tunnel_control_points()).unwrap()
    }

    #[test]
    fn test_default_scene_vertex_count() {
        let path = test_path();
        let scene = build_scene(&path, &TubeConfig::default(), &BoxConfig::default());
        // 400 rings x 40 spokes x 2 edges x 2 endpoints for the tube,
        // 55 boxes x 12 edges x 2 endpoints for the scatter.
        assert_eq!(scene.vertex_count(), 400 * 40 * 4 + 55 * 24);
    }

    #[test]
    fn test_vertex_count_scales_with_config() {
        let path = test_path();
        let tube = TubeConfig {
            radius: 1.0,
            tubular_segments: 100,
            radial_segments: 8,
        };
        let boxes = BoxConfig {
            count: 10,
            size: 0.05,
            scatter: 0.1,
            seed: 3,
        };
        let scene = build_scene(&path, &tube, &boxes);
        assert_eq!(scene.vertex_count(), 100 * 8 * 4 + 10 * 24);
    }

    #[test]
    fn test_tube_comes_first_and_is_red() {
        let path = test_path();
        let scene = build_scene(&path, &TubeConfig::default(), &BoxConfig::default());
        let tube_vertices = 400 * 40 * 4;
        assert_eq!(scene.vertices[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(scene.vertices[tube_vertices - 1].color, [1.0, 0.0, 0.0]);
        assert_ne!(scene.vertices[tube_vertices].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_tube_wraps_the_flight_path() {
        let path = test_path();
        let tube = TubeConfig::default();
        let vertices = tube_wireframe(&path, &tube);
        // At every ring-aligned progress the nearest wireframe vertex sits
        // one tube radius away from the path.
        for k in 0..16 {
            let on_path = path.point_at(k as f32 / 16.0);
            let nearest = vertices
                .iter()
                .map(|v| Vec3::from_array(v.position).distance(on_path))
                .fold(f32::MAX, f32::min);
            assert!(
                (nearest - tube.radius).abs() < 0.05,
                "nearest tube vertex at {} instead of {}",
                nearest,
                tube.radius
            );
        }
    }

    #[test]
    fn test_boxes_scatter_close_to_the_path() {
        let path = test_path();
        let vertices = box_wireframes(&path, &BoxConfig::default());
        let samples: Vec<Vec3> = (0..128)
            .map(|i| path.point_at(i as f32 / 128.0))
            .collect();
        for chunk in vertices.chunks(24) {
            let corner = Vec3::from_array(chunk[0].position);
            let nearest = samples
                .iter()
                .map(|s| s.distance(corner))
                .fold(f32::MAX, f32::min);
            assert!(nearest < 2.0, "box strayed {} from the path", nearest);
        }
    }

    #[test]
    fn test_each_box_has_one_color() {
        let path = test_path();
        let vertices = box_wireframes(&path, &BoxConfig::default());
        for chunk in vertices.chunks(24) {
            let color = chunk[0].color;
            assert!(chunk.iter().all(|v| v.color == color));
        }
    }

    #[test]
    fn test_box_hues_vary_along_the_loop() {
        let path = test_path();
        let vertices = box_wireframes(&path, &BoxConfig::default());
        let mut distinct: Vec<[f32; 3]> = Vec::new();
        for chunk in vertices.chunks(24) {
            if !distinct.contains(&chunk[0].color) {
                distinct.push(chunk[0].color);
            }
        }
        assert!(
            distinct.len() > 10,
            "expected a spread of hues, got {} distinct colors",
            distinct.len()
        );
    }

    #[test]
    fn test_scene_is_deterministic() {
        let path = test_path();
        let a = build_scene(&path, &TubeConfig::default(), &BoxConfig::default());
        let b = build_scene(&path, &TubeConfig::default(), &BoxConfig::default());
        assert_eq!(a.vertices, b.vertices);
    }

    #[test]
    fn test_seed_changes_the_scatter_but_not_the_tube() {
        let path = test_path();
        let tube = TubeConfig::default();
        let a = build_scene(&path, &tube, &BoxConfig { seed: 1, ..BoxConfig::default() });
        let b = build_scene(&path, &tube, &BoxConfig { seed: 2, ..BoxConfig::default() });
        let tube_vertices = (tube.tubular_segments * tube.radial_segments * 4) as usize;
        assert_eq!(a.vertices[..tube_vertices], b.vertices[..tube_vertices]);
        assert_ne!(a.vertices[tube_vertices..], b.vertices[tube_vertices..]);
    }

    #[test]
    fn test_all_scene_vertices_finite() {
        let path = test_path();
        let scene = build_scene(&path, &TubeConfig::default(), &BoxConfig::default());
        for v in &scene.vertices {
            assert!(v.position.iter().all(|c| c.is_finite()));
            assert!(v.color.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}
