//! Static cube meshes shared read-only by every instance.

use bytemuck::{Pod, Zeroable};

/// Position-only vertex used by the bar chart.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Vertex with a per-corner color, used by the rotating cube.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Corner `i` has `x = bit 0`, `y = bit 1`, `z = bit 2` (0 → low side, 1 → high side).
const CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Two counter-clockwise triangles per face, wound outward for back-face culling.
pub const CUBE_INDICES: [u16; 36] = [
    4, 5, 7, 4, 7, 6, // +z
    1, 0, 2, 1, 2, 3, // -z
    5, 1, 3, 5, 3, 7, // +x
    0, 4, 6, 0, 6, 2, // -x
    6, 7, 3, 6, 3, 2, // +y
    0, 1, 5, 0, 5, 4, // -y
];

/// Unit cube standing on the `y = 0` plane, centred on the `y` axis.
///
/// Scaling `y` grows the bar upwards from its base, so an instance offset
/// never needs to change when its height does.
pub fn bar_cube() -> [Vertex; 8] {
    CORNERS.map(|[x, y, z]| Vertex { position: [x - 0.5, y, z - 0.5] })
}

/// Unit cube centred on the origin. Each corner is colored by its position in
/// the unit RGB cube.
pub fn color_cube() -> [ColorVertex; 8] {
    CORNERS.map(|corner| ColorVertex {
        position: [corner[0] - 0.5, corner[1] - 0.5, corner[2] - 0.5],
        color: corner,
    })
}
