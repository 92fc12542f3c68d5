//! Map Exporter - 地图文件导出工具
//!
//! 读取存档 `data` 目录下的 `map_*.dat` 文件 (GZIP 压缩的 NBT 数据)，
//! 通过地图调色板把颜色索引转换为 RGBA 像素，保存为同名 PNG 图片。
//!
//! 使用方法:
//!   map_exporter -i <存档>/<世界>/data [-o <输出目录>]

mod batch;
mod config;
mod error;
mod formats;
mod image;
mod logging;
mod pipeline;

use anyhow::{Context, Result};
use batch::BatchReport;
use clap::Parser;
use config::Cli;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 参数为空时只打印提示，不算错误
    if let Some(flag) = cli.missing_flag() {
        println!("{flag} not set (see -h)");
        return ExitCode::SUCCESS;
    }

    let _guard = match logging::init_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli).await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            let corrupt = report.failures.iter().filter(|f| f.source.is_decode()).count();
            warn!(
                "{} 个文件导出失败，其中 {} 个无法解码",
                report.failures.len(),
                corrupt
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// 准备目录并运行批量导出
async fn run(cli: &Cli) -> Result<BatchReport> {
    info!("{} {} 启动", APP_NAME, APP_VERSION);

    let input = PathBuf::from(&cli.input);
    let files = batch::find_map_files(&input)
        .with_context(|| format!("无法读取输入目录: {}", input.display()))?;

    let output_dir = config::resolve_output_dir(&input, &cli.output)?;
    config::ensure_dir(&output_dir)?;

    info!("找到 {} 个地图文件", files.len());

    let palette = Arc::new(crate::image::Palette::map_colors());
    tracing::debug!("调色板共 {} 种颜色", palette.len());
    let report = batch::run_batch(files, &output_dir, palette, cli.batch_options()).await;

    info!(
        "导出 {}/{} 张地图, 耗时 {:?}",
        report.exported.len(),
        report.total,
        report.elapsed
    );
    info!("输出目录: {}", output_dir.display());

    Ok(report)
}

/// 应用程序名称
pub const APP_NAME: &str = "Map Exporter";

/// 应用程序版本（从 Cargo.toml 读取）
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_info() {
        assert_eq!(APP_NAME, "Map Exporter");
        assert!(!APP_VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_run_missing_input_dir() {
        let cli = Cli::try_parse_from(["map_exporter", "-i", "/no/such/world/data"]).unwrap();
        let err = run(&cli).await.unwrap_err();
        assert!(format!("{err:#}").contains("无法读取输入目录"));
    }

    #[tokio::test]
    async fn test_run_exports_into_custom_dir() {
        let world = pipeline::fixtures::temp_dir("main_run").join("World");
        let input = world.join("data");
        let output = world.join("png");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("map_0.dat"), pipeline::fixtures::map_file_bytes(&[6; 4])).unwrap();
        std::fs::write(input.join("idcounts.dat"), b"ignored").unwrap();

        let cli = Cli::try_parse_from([
            "map_exporter",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        let report = run(&cli).await.unwrap();
        assert_eq!(report.total, 1);
        assert!(report.is_success());
        assert!(output.join("map_0.png").is_file());
    }
}
