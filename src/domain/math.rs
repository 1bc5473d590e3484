//! 4×4 matrix helpers shared by both scene variants.
//!
//! Matrices are 16 `f32`s in column-major order, the layout WGSL expects for a
//! `mat4x4<f32>` uniform. Element `(row, col)` lives at index `col * 4 + row`.
//! Composition reads right to left: in `multiply(a, b)` the transform `b` is
//! applied to a vector first.
//!
//! Projections target a right-handed view space (camera looks down `-z`) and
//! WebGPU clip space with depth in `[0, 1]`.

pub type Mat4 = [f32; 16];
pub type Vec3 = [f32; 3];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Right-handed perspective projection mapping `-near` to depth 0 and `-far`
/// to depth 1.
///
/// Callers guarantee `0 < near < far` and `aspect > 0`; anything else yields a
/// degenerate matrix.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);
    let mut out = [0.0; 16];
    out[0] = f / aspect;
    out[5] = f;
    out[10] = far * nf;
    out[11] = -1.0;
    out[14] = far * near * nf;
    out
}

/// View matrix placing the camera at `eye` looking at `center`.
///
/// The basis is built by Gram–Schmidt: `z` points from `center` to `eye`,
/// `x` is `up` made orthogonal to `z`, and `y` completes the right-handed
/// frame. `up` must not be collinear with the view direction and `eye` must
/// differ from `center`.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let z = normalize(sub(eye, center));
    let x = normalize(cross(up, z));
    let y = cross(z, x);

    [
        x[0], y[0], z[0], 0.0, //
        x[1], y[1], z[1], 0.0, //
        x[2], y[2], z[2], 0.0, //
        -dot(x, eye),
        -dot(y, eye),
        -dot(z, eye),
        1.0,
    ]
}

/// Standard 4×4 product `a · b`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    out
}

/// Right-multiplies `m` by a rotation of `angle` radians about `axis`
/// (Rodrigues form). The axis does not need to be unit length but must be
/// non-zero.
pub fn rotate_axis(m: &Mat4, angle: f32, axis: Vec3) -> Mat4 {
    let [x, y, z] = normalize(axis);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    let rotation = [
        x * x * t + c,
        y * x * t + z * s,
        z * x * t - y * s,
        0.0,
        x * y * t - z * s,
        y * y * t + c,
        z * y * t + x * s,
        0.0,
        x * z * t + y * s,
        y * z * t - x * s,
        z * z * t + c,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ];
    multiply(m, &rotation)
}

/// Applies `m` to the point `p` (w = 1) and returns the homogeneous result.
pub fn transform_point(m: &Mat4, p: Vec3) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[row] * p[0] + m[4 + row] * p[1] + m[8 + row] * p[2] + m[12 + row];
    }
    out
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

pub fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_is_neutral() {
        let m = rotate_axis(&IDENTITY, 0.7, [0.0, 1.0, 0.0]);
        assert_eq!(multiply(&IDENTITY, &m), m);
        assert_eq!(multiply(&m, &IDENTITY), m);
    }

    #[test]
    fn quarter_turn_about_y_maps_x_to_minus_z() {
        let m = rotate_axis(&IDENTITY, std::f32::consts::FRAC_PI_2, [0.0, 1.0, 0.0]);
        let p = transform_point(&m, [1.0, 0.0, 0.0]);
        assert!(approx(p[0], 0.0));
        assert!(approx(p[1], 0.0));
        assert!(approx(p[2], -1.0));
    }

    #[test]
    fn translation_then_rotation_order_matters() {
        let mut translate = IDENTITY;
        translate[12] = 2.0;
        let rotate = rotate_axis(&IDENTITY, std::f32::consts::FRAC_PI_2, [0.0, 0.0, 1.0]);

        let rotate_after = transform_point(&multiply(&rotate, &translate), [0.0, 0.0, 0.0]);
        let translate_after = transform_point(&multiply(&translate, &rotate), [0.0, 0.0, 0.0]);

        assert!(approx(rotate_after[0], 0.0) && approx(rotate_after[1], 2.0));
        assert!(approx(translate_after[0], 2.0) && approx(translate_after[1], 0.0));
    }
}
