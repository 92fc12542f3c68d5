//! 批量导出
//!
//! 每个文件作为一个独立任务运行，互不影响。调色板只读共享。

use crate::error::{FileError, MapError, Result, Stage};
use crate::image::Palette;
use crate::pipeline::{ExportOptions, ExportedMap, export_map};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// 地图文件名前缀
pub const MAP_FILE_PREFIX: &str = "map_";
/// 地图文件扩展名
pub const MAP_FILE_SUFFIX: &str = ".dat";

/// 批量导出选项
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// 同时处理的文件数
    pub jobs: usize,
    pub export: ExportOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            export: ExportOptions::default(),
        }
    }
}

/// 默认并行数 (CPU 核心数)
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(2)
}

/// 批量导出结果
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 找到的文件数
    pub total: usize,
    pub exported: Vec<ExportedMap>,
    pub failures: Vec<FileError>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 文件名是否符合 `map_*.dat`
pub fn is_map_file_name(name: &str) -> bool {
    name.starts_with(MAP_FILE_PREFIX) && name.ends_with(MAP_FILE_SUFFIX)
}

/// 列出目录中所有地图文件，按文件名排序
pub fn find_map_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::debug!("跳过非 UTF-8 文件名: {:?}", name);
            continue;
        };
        if !is_map_file_name(name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            tracing::debug!("跳过非普通文件: {}", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// 并行导出所有文件，等待全部完成后返回结果
///
/// 单个文件的失败 (包括工作线程 panic) 只记录在报告中，不影响其他文件。
pub async fn run_batch(
    files: Vec<PathBuf>,
    output_dir: &Path,
    palette: Arc<Palette>,
    options: BatchOptions,
) -> BatchReport {
    let start = Instant::now();
    let total = files.len();
    let semaphore = Arc::new(Semaphore::new(options.jobs.max(1)));
    let output_dir = Arc::new(output_dir.to_path_buf());

    tracing::debug!("开始导出 {} 个文件，并行数 {}", total, options.jobs.max(1));

    let pending: BTreeSet<PathBuf> = files.iter().cloned().collect();

    let mut tasks = JoinSet::new();
    for path in files {
        let semaphore = Arc::clone(&semaphore);
        let palette = Arc::clone(&palette);
        let output_dir = Arc::clone(&output_dir);
        let export = options.export;

        tasks.spawn(async move {
            // 信号量不会被关闭
            let _permit = semaphore.acquire_owned().await.ok();

            let task_path = path.clone();
            let joined = tokio::task::spawn_blocking(move || {
                export_map(&task_path, &output_dir, &palette, &export)
            })
            .await;

            match joined {
                Ok(result) => result,
                Err(e) => Err(FileError::new(
                    path,
                    Stage::Worker,
                    MapError::Worker(e.to_string()),
                )),
            }
        });
    }

    let mut report = BatchReport {
        total,
        ..BatchReport::default()
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(exported)) => {
                tracing::info!(
                    "已导出 {} ({}x{})",
                    exported.output.display(),
                    exported.side,
                    exported.side
                );
                report.exported.push(exported);
            }
            Ok(Err(e)) => {
                tracing::error!("{e}");
                report.failures.push(e);
            }
            Err(e) => {
                tracing::error!("导出任务异常终止: {e}");
            }
        }
    }

    record_lost_tasks(&mut report, pending);

    report.exported.sort_by(|a, b| a.input.cmp(&b.input));
    report.failures.sort_by(|a, b| a.path.cmp(&b.path));
    report.elapsed = start.elapsed();
    report
}

/// 没有返回结果的文件 (外层任务异常终止) 记为工作线程失败
fn record_lost_tasks(report: &mut BatchReport, mut pending: BTreeSet<PathBuf>) {
    for exported in &report.exported {
        pending.remove(&exported.input);
    }
    for failure in &report.failures {
        pending.remove(&failure.path);
    }
    for path in pending {
        let e = FileError::new(
            path,
            Stage::Worker,
            MapError::Worker("任务异常终止，没有返回结果".to_string()),
        );
        tracing::error!("{e}");
        report.failures.push(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{map_file_bytes, shapeless_file_bytes, temp_dir};

    #[test]
    fn test_is_map_file_name() {
        assert!(is_map_file_name("map_0.dat"));
        assert!(is_map_file_name("map_1234.dat"));
        assert!(is_map_file_name("map_.dat"));
        assert!(!is_map_file_name("idcounts.dat"));
        assert!(!is_map_file_name("map_1.dat_old"));
        assert!(!is_map_file_name("raids.dat"));
        assert!(!is_map_file_name("Map_1.dat"));
    }

    #[test]
    fn test_find_map_files() {
        let dir = temp_dir("batch_find");
        std::fs::write(dir.join("map_2.dat"), b"").unwrap();
        std::fs::write(dir.join("map_10.dat"), b"").unwrap();
        std::fs::write(dir.join("idcounts.dat"), b"").unwrap();
        std::fs::write(dir.join("map_3.png"), b"").unwrap();
        std::fs::create_dir(dir.join("map_4.dat")).unwrap();

        let files = find_map_files(&dir).unwrap();
        assert_eq!(files, vec![dir.join("map_10.dat"), dir.join("map_2.dat")]);
    }

    #[test]
    fn test_find_map_files_missing_dir() {
        let dir = temp_dir("batch_missing").join("nope");
        assert!(matches!(find_map_files(&dir), Err(MapError::Io(_))));
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let input = temp_dir("batch_contained_in");
        let output = temp_dir("batch_contained_out");
        std::fs::write(input.join("map_1.dat"), map_file_bytes(&[0, 1, 2, 3])).unwrap();
        std::fs::write(input.join("map_2.dat"), b"\x1f\x8bbroken").unwrap();
        std::fs::write(input.join("map_3.dat"), map_file_bytes(&[5; 9])).unwrap();
        std::fs::write(input.join("map_4.dat"), shapeless_file_bytes()).unwrap();

        let files = find_map_files(&input).unwrap();
        let palette = Arc::new(Palette::map_colors());
        let report = run_batch(files, &output, palette, BatchOptions::default()).await;

        assert_eq!(report.total, 4);
        assert_eq!(report.exported.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert!(!report.is_success());

        assert_eq!(report.failures[0].path, input.join("map_2.dat"));
        assert_eq!(report.failures[0].stage, Stage::Decompress);
        assert_eq!(report.failures[1].path, input.join("map_4.dat"));
        assert_eq!(report.failures[1].stage, Stage::Extract);

        assert!(output.join("map_1.png").is_file());
        assert!(output.join("map_3.png").is_file());
        assert!(!output.join("map_2.png").exists());
        assert_eq!(report.exported[1].side, 3);
    }

    #[tokio::test]
    async fn test_single_job() {
        let input = temp_dir("batch_single_in");
        let output = temp_dir("batch_single_out");
        for i in 0..5 {
            std::fs::write(input.join(format!("map_{i}.dat")), map_file_bytes(&[8; 16])).unwrap();
        }

        let options = BatchOptions {
            jobs: 1,
            ..BatchOptions::default()
        };
        let files = find_map_files(&input).unwrap();
        let report = run_batch(files, &output, Arc::new(Palette::map_colors()), options).await;

        assert!(report.is_success());
        assert_eq!(report.exported.len(), 5);
        for i in 0..5 {
            assert!(output.join(format!("map_{i}.png")).is_file());
        }
    }

    #[test]
    fn test_lost_tasks_become_failures() {
        let files: BTreeSet<PathBuf> = ["map_1.dat", "map_2.dat", "map_3.dat"]
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let mut report = BatchReport {
            total: files.len(),
            exported: vec![ExportedMap {
                input: PathBuf::from("map_1.dat"),
                output: PathBuf::from("map_1.png"),
                side: 1,
            }],
            failures: vec![FileError::new(
                "map_3.dat",
                Stage::Decompress,
                MapError::Decompress("bad".to_string()),
            )],
            ..BatchReport::default()
        };

        record_lost_tasks(&mut report, files);

        assert_eq!(report.exported.len() + report.failures.len(), report.total);
        let lost = &report.failures[1];
        assert_eq!(lost.path, PathBuf::from("map_2.dat"));
        assert_eq!(lost.stage, Stage::Worker);
        assert!(matches!(lost.source, MapError::Worker(_)));
    }

    #[test]
    fn test_nothing_lost_when_all_report() {
        let files: BTreeSet<PathBuf> = [PathBuf::from("map_1.dat")].into_iter().collect();
        let mut report = BatchReport {
            total: 1,
            failures: vec![FileError::new(
                "map_1.dat",
                Stage::Worker,
                MapError::Worker("panic".to_string()),
            )],
            ..BatchReport::default()
        };
        record_lost_tasks(&mut report, files);
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let output = temp_dir("batch_empty_out");
        let report = run_batch(
            Vec::new(),
            &output,
            Arc::new(Palette::map_colors()),
            BatchOptions::default(),
        )
        .await;
        assert_eq!(report.total, 0);
        assert!(report.is_success());
    }
}
