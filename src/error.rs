//! 错误类型定义

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 地图导出错误类型
#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("解压缩错误: {0}")]
    Decompress(String),

    #[error("NBT 解析错误: {0}")]
    Nbt(String),

    #[error("unexpected map data shape: {0}")]
    Shape(String),

    #[error("palette index out of range: {index} (调色板长度 {len})")]
    PaletteIndexOutOfRange { index: u8, len: usize },

    #[error("颜色数据长度 {len} 不是完全平方数")]
    NonSquareGrid { len: usize },

    #[error("图片编码错误: {0}")]
    Image(#[from] image::ImageError),

    #[error("无效的图片数据")]
    InvalidImageData,

    #[error("工作线程异常: {0}")]
    Worker(String),
}

impl MapError {
    /// 是否属于解码阶段 (解压缩或 NBT 解析) 的错误
    pub fn is_decode(&self) -> bool {
        matches!(self, MapError::Decompress(_) | MapError::Nbt(_))
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

/// 单个文件处理流程中的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Decompress,
    Parse,
    Extract,
    Render,
    Write,
    Worker,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "读取",
            Stage::Decompress => "解压缩",
            Stage::Parse => "解析",
            Stage::Extract => "提取",
            Stage::Render => "渲染",
            Stage::Write => "写入",
            Stage::Worker => "执行",
        };
        f.write_str(name)
    }
}

/// 单个文件的错误，附带文件路径和出错阶段
#[derive(Error, Debug)]
#[error("{}: {stage}阶段失败: {source}", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    pub stage: Stage,
    #[source]
    pub source: MapError,
}

impl FileError {
    pub fn new(path: impl Into<PathBuf>, stage: Stage, source: MapError) -> Self {
        Self {
            path: path.into(),
            stage,
            source,
        }
    }
}

/// 为 `Result` 附加文件与阶段信息
pub trait StageExt<T> {
    fn at_stage(self, path: &std::path::Path, stage: Stage) -> std::result::Result<T, FileError>;
}

impl<T> StageExt<T> for Result<T> {
    fn at_stage(self, path: &std::path::Path, stage: Stage) -> std::result::Result<T, FileError> {
        self.map_err(|e| FileError::new(path, stage, e))
    }
}
