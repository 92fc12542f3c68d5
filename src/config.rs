//! 命令行参数和输出目录

use crate::batch::{BatchOptions, default_jobs};
use crate::image::{PngCompression, ShapePolicy};
use crate::pipeline::ExportOptions;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// 默认输出目录名
pub const DEFAULT_OUTPUT: &str = "output";

/// 将地图 map_*.dat 文件导出为 PNG 图片
#[derive(Parser, Debug)]
#[command(name = "map_exporter", version)]
pub struct Cli {
    /// 输入目录的完整路径
    #[arg(short = 'i', default_value = "")]
    pub input: String,

    /// 输出目录名 (保持默认值时会按世界名称创建子目录)
    #[arg(short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// 同时处理的文件数 (默认为 CPU 核心数)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// 颜色数据长度不是完全平方数时报错而不是截断
    #[arg(long)]
    pub strict_shape: bool,

    /// PNG 压缩级别
    #[arg(long, value_enum, default_value_t = PngCompression::Default)]
    pub compression: PngCompression,

    /// 日志详细程度 (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// 同时把日志写入该目录 (按天滚动)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// 第一个值为空的必填参数
    pub fn missing_flag(&self) -> Option<&'static str> {
        if self.input.is_empty() {
            Some("i")
        } else if self.output.is_empty() {
            Some("o")
        } else {
            None
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        let shape_policy = if self.strict_shape {
            ShapePolicy::Strict
        } else {
            ShapePolicy::Truncate
        };
        BatchOptions {
            jobs: self.jobs.unwrap_or_else(default_jobs).max(1),
            export: ExportOptions {
                shape_policy,
                compression: self.compression,
            },
        }
    }
}

/// 世界名称，即输入目录的上一级目录名
///
/// 地图文件通常位于 `<存档>/<世界>/data/` 下。
pub fn world_name(input: &Path) -> Result<String> {
    let absolute = std::path::absolute(input)
        .with_context(|| format!("无法解析输入路径: {}", input.display()))?;

    let mut parts: Vec<&OsStr> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }

    if parts.len() < 2 {
        bail!("路径层级不足，无法确定世界名称: {}", input.display());
    }
    Ok(parts[parts.len() - 2].to_string_lossy().into_owned())
}

/// 解析输出目录
///
/// `-o` 为默认值时输出到 `output/<世界名称>`，否则直接使用给定路径。
pub fn resolve_output_dir(input: &Path, output: &str) -> Result<PathBuf> {
    let base = std::path::absolute(output)
        .with_context(|| format!("无法解析输出路径: {output}"))?;

    if output != DEFAULT_OUTPUT {
        return Ok(base);
    }
    Ok(base.join(world_name(input)?))
}

/// 确保目录存在，返回是否新建
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        tracing::info!("目录已存在: {}", dir.display());
        return Ok(false);
    }
    std::fs::create_dir_all(dir).with_context(|| format!("无法创建输出目录: {}", dir.display()))?;
    tracing::info!("已创建目录: {}", dir.display());
    Ok(true)
}
