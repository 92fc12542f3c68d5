//! 颜色索引渲染为 RGBA 图像

use crate::error::{MapError, Result};
use crate::image::palette::{Color, Palette};
use image::RgbaImage;

/// 颜色数据长度不是完全平方数时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapePolicy {
    /// 只保留前 `side * side` 个像素
    #[default]
    Truncate,
    /// 直接报错
    Strict,
}

/// 计算正方形边长 `floor(sqrt(len))`
pub fn side_length(len: usize) -> usize {
    let mut side = (len as f64).sqrt() as usize;
    // 修正浮点误差
    while side * side > len {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= len {
        side += 1;
    }
    side
}

/// 将每个调色板索引解析为颜色
pub fn resolve_colors(indices: &[u8], palette: &Palette) -> Result<Vec<Color>> {
    indices.iter().map(|&index| palette.get(index)).collect()
}

/// 将颜色索引渲染为正方形图像
///
/// 平铺位置 `y * side + x` 的像素放在 `(x, y)`，原点在左上角。
pub fn render(indices: &[u8], palette: &Palette, policy: ShapePolicy) -> Result<RgbaImage> {
    let pixels = resolve_colors(indices, palette)?;

    let side = side_length(pixels.len());
    let used = side * side;
    if used != pixels.len() {
        match policy {
            ShapePolicy::Strict => {
                return Err(MapError::NonSquareGrid { len: pixels.len() });
            }
            ShapePolicy::Truncate => {
                tracing::debug!(
                    "颜色数据长度 {} 不是完全平方数，丢弃末尾 {} 个像素",
                    pixels.len(),
                    pixels.len() - used
                );
            }
        }
    }

    let side = side as u32;
    let img = RgbaImage::from_fn(side, side, |x, y| {
        pixels[(y * side + x) as usize].to_rgba()
    });

    Ok(img)
}
