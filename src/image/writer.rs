//! PNG 输出

use crate::error::{MapError, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// PNG 压缩级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// 将图像编码为 PNG 写入任意输出流
pub fn encode_png<W: Write>(img: &RgbaImage, writer: W, compression: PngCompression) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(MapError::InvalidImageData);
    }

    let encoder = PngEncoder::new_with_quality(writer, compression.into(), FilterType::Adaptive);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)?;
    Ok(())
}

/// 将图像保存为 PNG 文件
pub fn write_png(img: &RgbaImage, path: &Path, compression: PngCompression) -> Result<()> {
    // 空图像不创建文件
    if img.width() == 0 || img.height() == 0 {
        return Err(MapError::InvalidImageData);
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_png(img, &mut writer, compression)?;
    writer.flush()?;
    Ok(())
}
