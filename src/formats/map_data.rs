//! 地图数据提取
//!
//! 地图文件的结构为 `{"": {"data": {"colors": ByteArray, "scale": Byte, ...}}}`。

use crate::error::{MapError, Result};
use crate::formats::nbt::Compound;

/// 从根标签中取出颜色索引数组
pub fn extract_colors(root: &Compound) -> Result<&[u8]> {
    let data = root
        .get("data")
        .and_then(|tag| tag.as_compound())
        .map_err(|e| MapError::Shape(format!("data: {}", shape_detail(e))))?;

    data.get("colors")
        .and_then(|tag| tag.as_byte_array())
        .map_err(|e| MapError::Shape(format!("data.colors: {}", shape_detail(e))))
}

fn shape_detail(err: MapError) -> String {
    match err {
        MapError::Shape(detail) => detail,
        other => other.to_string(),
    }
}

/// 一张地图的颜色数据和附加信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapData<'a> {
    /// 颜色索引
    pub colors: &'a [u8],
    /// 缩放等级
    pub scale: Option<i8>,
    /// 中心点 X 坐标
    pub x_center: Option<i32>,
    /// 中心点 Z 坐标
    pub z_center: Option<i32>,
    /// 是否锁定
    pub locked: Option<bool>,
}

impl<'a> MapData<'a> {
    /// 从根标签读取地图数据
    ///
    /// 只有 `colors` 是必需的，其他字段缺失或类型不符时忽略。
    pub fn from_root(root: &'a Compound) -> Result<Self> {
        let colors = extract_colors(root)?;
        let data = root.get("data")?.as_compound()?;

        let byte = |key: &str| data.find(key).and_then(|t| t.as_byte().ok());
        let int = |key: &str| data.find(key).and_then(|t| t.as_int().ok());

        Ok(Self {
            colors,
            scale: byte("scale"),
            x_center: int("xCenter"),
            z_center: int("zCenter"),
            locked: byte("locked").map(|v| v != 0),
        })
    }
}
