/// Triangle list over the eight corners of [`unit_cube_positions`], two
/// triangles per face.
pub const UNIT_CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 1, 3, // -Z
    4, 5, 6, 6, 5, 7, // +Z
    2, 6, 3, 6, 7, 3, // +Y
    0, 1, 4, 4, 5, 1, // -Y
    1, 3, 7, 5, 1, 7, // +X
    0, 6, 2, 0, 4, 6, // -X
];

/// Corners of a unit cube centered on the origin. Corner `i = x + 2y + 4z`
/// sits at `(x - 0.5, y - 0.5, z - 0.5)` for `x, y, z` in `{0, 1}`.
#[must_use]
pub fn unit_cube_positions() -> [f32; 24] {
    let mut positions = [0.0; 24];

    for (i, corner) in positions.chunks_exact_mut(3).enumerate() {
        corner[0] = (i & 1) as f32 - 0.5;
        corner[1] = ((i >> 1) & 1) as f32 - 0.5;
        corner[2] = ((i >> 2) & 1) as f32 - 0.5;
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_layout() {
        let p = unit_cube_positions();
        assert_eq!(&p[0..3], &[-0.5, -0.5, -0.5]);
        assert_eq!(&p[3..6], &[0.5, -0.5, -0.5]);
        assert_eq!(&p[6..9], &[-0.5, 0.5, -0.5]);
        assert_eq!(&p[12..15], &[-0.5, -0.5, 0.5]);
        assert_eq!(&p[21..24], &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn indices_stay_in_range() {
        assert!(UNIT_CUBE_INDICES.iter().all(|&i| i < 8));
    }
}
