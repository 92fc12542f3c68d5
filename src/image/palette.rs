//! 调色板定义和构建

use crate::error::{MapError, Result};
use crate::image::palette_data::{BASE_COLORS, MULTIPLIERS};
use image::Rgba;

/// 每个基础颜色对应的亮度等级数
pub const SHADES_PER_COLOR: usize = 4;

/// RGBA 颜色结构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 按亮度倍率缩放 RGB 分量，alpha 保持不变
    ///
    /// 每个分量计算 `c * multiplier / 255`，向下取整。
    pub fn scale(self, multiplier: u8) -> Color {
        let m = multiplier as u32;
        Color {
            r: (self.r as u32 * m / 255) as u8,
            g: (self.g as u32 * m / 255) as u8,
            b: (self.b as u32 * m / 255) as u8,
            a: self.a,
        }
    }

    /// 转换为 image 库的像素类型
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// 完整调色板
///
/// 构建后只读，可以通过 `Arc` 在多个工作线程间共享。
/// 位置 `base_index * 4 + shade` 的颜色等于 `base_colors[base_index].scale(multipliers[shade])`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// 由基础颜色和亮度倍率构建调色板
    ///
    /// 外层按基础颜色顺序，内层按倍率顺序。
    pub fn build(base_colors: &[Color], multipliers: &[u8; SHADES_PER_COLOR]) -> Self {
        let mut colors = Vec::with_capacity(base_colors.len() * SHADES_PER_COLOR);
        for &base in base_colors {
            for &multiplier in multipliers {
                colors.push(base.scale(multiplier));
            }
        }
        Self { colors }
    }

    /// 地图使用的默认调色板
    pub fn map_colors() -> Self {
        Self::build(&BASE_COLORS, &MULTIPLIERS)
    }

    /// 获取指定索引的颜色
    pub fn get(&self, index: u8) -> Result<Color> {
        self.colors
            .get(index as usize)
            .copied()
            .ok_or(MapError::PaletteIndexOutOfRange {
                index,
                len: self.colors.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::palette_data::BASE_COLOR_COUNT;

    #[test]
    fn test_scale_floor_division() {
        let color = Color::new(200, 100, 50, 255);
        assert_eq!(color.scale(180), Color::new(141, 70, 35, 255));
    }

    #[test]
    fn test_scale_full_multiplier_is_identity() {
        for c in 0..=255u8 {
            let color = Color::new(c, 255 - c, c / 2, 77);
            assert_eq!(color.scale(255), color);
        }
    }

    #[test]
    fn test_scale_keeps_alpha() {
        let color = Color::new(255, 255, 255, 0);
        let scaled = color.scale(135);
        assert_eq!(scaled.a, 0);
        assert_eq!(scaled.r, 135);
    }

    #[test]
    fn test_palette_size() {
        let palette = Palette::map_colors();
        assert_eq!(palette.len(), BASE_COLOR_COUNT * SHADES_PER_COLOR);
        assert_eq!(palette.len(), 248);
    }

    #[test]
    fn test_palette_is_deterministic() {
        assert_eq!(Palette::map_colors(), Palette::map_colors());
    }

    #[test]
    fn test_palette_layout() {
        let palette = Palette::map_colors();
        for (base_index, base) in BASE_COLORS.iter().enumerate() {
            for (shade, &multiplier) in MULTIPLIERS.iter().enumerate() {
                let index = (base_index * SHADES_PER_COLOR + shade) as u8;
                assert_eq!(palette.get(index).unwrap(), base.scale(multiplier));
            }
        }
    }

    #[test]
    fn test_palette_known_entries() {
        let palette = Palette::map_colors();
        // 索引 0..4 为透明色
        for i in 0..4 {
            assert_eq!(palette.get(i).unwrap().a, 0);
        }
        // 基础颜色 1 (127, 178, 56) 在倍率 255 下保持原色
        assert_eq!(palette.get(6).unwrap(), Color::new(127, 178, 56, 255));
        // 倍率 180: 127*180/255 = 89, 178*180/255 = 125, 56*180/255 = 39
        assert_eq!(palette.get(4).unwrap(), Color::new(89, 125, 39, 255));
    }

    #[test]
    fn test_palette_index_out_of_range() {
        let palette = Palette::map_colors();
        let err = palette.get(255).unwrap_err();
        assert!(matches!(
            err,
            MapError::PaletteIndexOutOfRange { index: 255, len: 248 }
        ));
        assert!(palette.get(247).is_ok());
        assert!(palette.get(248).is_err());
    }

    #[test]
    fn test_custom_palette() {
        let base = [Color::new(0, 0, 0, 0), Color::new(255, 0, 0, 255)];
        let palette = Palette::build(&base, &[255, 0, 255, 0]);
        assert_eq!(palette.len(), 8);
        assert_eq!(palette.get(4).unwrap(), Color::new(255, 0, 0, 255));
        assert_eq!(palette.get(5).unwrap(), Color::new(0, 0, 0, 255));
    }
}
