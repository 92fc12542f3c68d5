//! 地图颜色基础数据
//!
//! 基础颜色按游戏中的颜色 ID 排列，索引 0 为完全透明。

use super::palette::Color;

/// 基础颜色数量
pub const BASE_COLOR_COUNT: usize = 62;

/// 基础颜色表
pub const BASE_COLORS: [Color; BASE_COLOR_COUNT] = [
    Color::new(0, 0, 0, 0), // 0
    Color::new(127, 178, 56, 255), // 1
    Color::new(247, 233, 163, 255), // 2
    Color::new(199, 199, 199, 255), // 3
    Color::new(255, 0, 0, 255), // 4
    Color::new(160, 160, 255, 255), // 5
    Color::new(167, 167, 167, 255), // 6
    Color::new(0, 124, 0, 255), // 7
    Color::new(255, 255, 255, 255), // 8
    Color::new(164, 168, 184, 255), // 9
    Color::new(151, 109, 77, 255), // 10
    Color::new(112, 112, 112, 255), // 11
    Color::new(64, 64, 255, 255), // 12
    Color::new(143, 119, 72, 255), // 13
    Color::new(255, 252, 245, 255), // 14
    Color::new(216, 127, 51, 255), // 15
    Color::new(178, 76, 216, 255), // 16
    Color::new(102, 153, 216, 255), // 17
    Color::new(229, 229, 51, 255), // 18
    Color::new(127, 204, 25, 255), // 19
    Color::new(242, 127, 165, 255), // 20
    Color::new(76, 76, 76, 255), // 21
    Color::new(153, 153, 153, 255), // 22
    Color::new(76, 127, 153, 255), // 23
    Color::new(127, 63, 178, 255), // 24
    Color::new(51, 76, 178, 255), // 25
    Color::new(102, 76, 51, 255), // 26
    Color::new(102, 127, 51, 255), // 27
    Color::new(153, 51, 51, 255), // 28
    Color::new(25, 25, 25, 255), // 29
    Color::new(250, 238, 77, 255), // 30
    Color::new(92, 219, 213, 255), // 31
    Color::new(74, 128, 255, 255), // 32
    Color::new(0, 217, 58, 255), // 33
    Color::new(129, 86, 49, 255), // 34
    Color::new(112, 2, 0, 255), // 35
    Color::new(209, 177, 161, 255), // 36
    Color::new(159, 82, 36, 255), // 37
    Color::new(149, 87, 108, 255), // 38
    Color::new(112, 108, 138, 255), // 39
    Color::new(186, 133, 36, 255), // 40
    Color::new(103, 117, 53, 255), // 41
    Color::new(160, 77, 78, 255), // 42
    Color::new(57, 41, 35, 255), // 43
    Color::new(135, 107, 98, 255), // 44
    Color::new(87, 92, 92, 255), // 45
    Color::new(122, 73, 88, 255), // 46
    Color::new(76, 62, 92, 255), // 47
    Color::new(76, 50, 35, 255), // 48
    Color::new(76, 82, 42, 255), // 49
    Color::new(142, 60, 46, 255), // 50
    Color::new(37, 22, 16, 255), // 51
    Color::new(189, 48, 49, 255), // 52
    Color::new(148, 63, 97, 255), // 53
    Color::new(92, 25, 29, 255), // 54
    Color::new(22, 126, 134, 255), // 55
    Color::new(58, 142, 140, 255), // 56
    Color::new(86, 44, 62, 255), // 57
    Color::new(20, 180, 133, 255), // 58
    Color::new(100, 100, 100, 255), // 59
    Color::new(216, 175, 147, 255), // 60
    Color::new(127, 167, 150, 255), // 61
];

/// 亮度倍率，按亮度等级 0..=3 排列
pub const MULTIPLIERS: [u8; 4] = [180, 220, 255, 135];
