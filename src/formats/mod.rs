//! 地图文件格式解析模块

pub mod map_data;
pub mod nbt;

pub use map_data::MapData;
