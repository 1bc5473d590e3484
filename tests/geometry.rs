use insta::assert_json_snapshot;
use price_bars_wasm::domain::geometry::{CUBE_INDICES, bar_cube, color_cube};
use price_bars_wasm::domain::math;

#[test]
fn cube_indices_snapshot() {
    assert_json_snapshot!("cube_indices", CUBE_INDICES.to_vec());
}

#[test]
fn every_face_winds_outward() {
    let cube = color_cube();
    for triangle in CUBE_INDICES.chunks(3) {
        let [a, b, c] = [0, 1, 2].map(|i| cube[triangle[i] as usize].position);
        let normal = math::cross(math::sub(b, a), math::sub(c, a));
        let centroid = [
            (a[0] + b[0] + c[0]) / 3.0,
            (a[1] + b[1] + c[1]) / 3.0,
            (a[2] + b[2] + c[2]) / 3.0,
        ];
        assert!(math::dot(normal, centroid) > 0.0, "triangle {triangle:?} faces inward");
    }
}

#[test]
fn indices_reference_all_eight_corners() {
    let mut seen = [false; 8];
    for &i in &CUBE_INDICES {
        seen[i as usize] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn bar_cube_stands_on_the_floor() {
    let cube = bar_cube();
    let min_y = cube.iter().map(|v| v.position[1]).fold(f32::INFINITY, f32::min);
    let max_y = cube.iter().map(|v| v.position[1]).fold(f32::NEG_INFINITY, f32::max);
    assert_eq!((min_y, max_y), (0.0, 1.0));
    assert!(cube.iter().all(|v| v.position[0].abs() == 0.5 && v.position[2].abs() == 0.5));
}

#[test]
fn color_cube_colors_follow_corners() {
    for vertex in color_cube() {
        let expected = vertex.position.map(|p| p + 0.5);
        assert_eq!(vertex.color, expected);
    }
}
