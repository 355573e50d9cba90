pub mod box_shape;

pub use box_shape::{UNIT_CUBE_INDICES, unit_cube_positions};
