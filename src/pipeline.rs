//! 单个地图文件的导出流程
//!
//! 读取 → GZIP 解压 → NBT 解析 → 提取颜色 → 渲染 → 写出 PNG

use crate::error::{FileError, MapError, Stage, StageExt};
use crate::formats::{MapData, nbt};
use crate::image::{Palette, PngCompression, ShapePolicy, decompress_gzip, render, write_png};
use std::path::{Path, PathBuf};

/// 导出选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub shape_policy: ShapePolicy,
    pub compression: PngCompression,
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedMap {
    pub input: PathBuf,
    pub output: PathBuf,
    /// 图像边长
    pub side: u32,
}

/// 输入文件名对应的输出文件名 (`map_12.dat` → `map_12.png`)
pub fn output_file_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    PathBuf::from(stem).with_extension("png")
}

/// 导出一个地图文件到输出目录
pub fn export_map(
    input: &Path,
    output_dir: &Path,
    palette: &Palette,
    options: &ExportOptions,
) -> Result<ExportedMap, FileError> {
    let raw = std::fs::read(input)
        .map_err(MapError::from)
        .at_stage(input, Stage::Read)?;

    let decompressed = decompress_gzip(&raw).at_stage(input, Stage::Decompress)?;
    let doc = nbt::parse(&decompressed).at_stage(input, Stage::Parse)?;
    let map = MapData::from_root(&doc.root).at_stage(input, Stage::Extract)?;

    tracing::debug!(
        "{}: 根标签 {:?}, {} 个颜色, scale={:?}, center=({:?}, {:?}), locked={:?}",
        input.display(),
        doc.name,
        map.colors.len(),
        map.scale,
        map.x_center,
        map.z_center,
        map.locked
    );

    let img = render(map.colors, palette, options.shape_policy).at_stage(input, Stage::Render)?;

    let output = output_dir.join(output_file_name(input));
    write_png(&img, &output, options.compression).at_stage(input, Stage::Write)?;

    Ok(ExportedMap {
        input: input.to_path_buf(),
        output,
        side: img.width(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::formats::nbt::{Compound, NbtDocument, Tag, encode::encode};
    use crate::image::compression::compress_gzip;
    use std::path::PathBuf;

    /// 生成 gzip 压缩的地图文件内容
    pub fn map_file_bytes(colors: &[u8]) -> Vec<u8> {
        let mut data = Compound::new();
        data.insert("colors", Tag::ByteArray(colors.to_vec()));
        data.insert("scale", Tag::Byte(0));
        let mut root = Compound::new();
        root.insert("data", Tag::Compound(data));
        root.insert("DataVersion", Tag::Int(3465));
        compress_gzip(&encode(&NbtDocument {
            name: String::new(),
            root,
        }))
        .unwrap()
    }

    /// 生成不含 colors 字段的地图文件内容
    pub fn shapeless_file_bytes() -> Vec<u8> {
        let mut data = Compound::new();
        data.insert("scale", Tag::Byte(0));
        let mut root = Compound::new();
        root.insert("data", Tag::Compound(data));
        compress_gzip(&encode(&NbtDocument {
            name: String::new(),
            root,
        }))
        .unwrap()
    }

    /// 创建一个空的临时目录
    pub fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("map_exporter_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
