// Functions are organized by categories
pub mod math;
pub mod plot3d;
