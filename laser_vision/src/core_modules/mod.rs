pub mod circularity;
pub mod contour;
pub mod edges;
pub mod enclosing_circle;
pub mod frame;
pub mod hsv;
pub mod masks;
pub mod overlay;
