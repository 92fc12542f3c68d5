//! 图像处理模块

pub mod compression;
pub mod palette;
pub mod palette_data;
pub mod render;
pub mod writer;

pub use compression::decompress_gzip;
pub use palette::Palette;
pub use render::{ShapePolicy, render};
pub use writer::{PngCompression, write_png};
