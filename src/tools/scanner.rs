//! 输入展开模块
//!
//! 把命令行给出的路径列表展开为有序的文件列表：
//! - 普通文件按给定顺序保留（不存在的路径原样保留，打开时报致命错误）
//! - 目录使用 walkdir 迭代遍历（不依赖递归深度），同目录内按文件名排序
//! - 目录中的隐藏文件/目录被跳过

use super::cli::AppConfig;
use super::utils;
use crate::error::{AnalysisError, AnalysisResult};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 展开输入路径
pub fn expand_inputs(inputs: &[PathBuf], extension: Option<&str>) -> AnalysisResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_directory(input, extension, &mut files)?;
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}

fn collect_directory(
    dir: &Path,
    extension: Option<&str>,
    files: &mut Vec<PathBuf>,
) -> AnalysisResult<()> {
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            AnalysisError::FileOpenFailure {
                path,
                source: err.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if matches_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn matches_extension(path: &Path, extension: Option<&str>) -> bool {
    let Some(wanted) = extension else {
        return true;
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// 显示文件展开结果
pub fn show_scan_results(config: &AppConfig, files: &[PathBuf]) {
    if files.is_empty() {
        println!("[WARNING] 没有找到可处理的事件文件 / No event files to process");
        if let Some(ext) = &config.extension {
            println!("   扩展名过滤 / Extension filter: .{ext}");
        }
        return;
    }

    println!("[INFO] 找到 {} 个事件文件 / Found {} event files", files.len(), files.len());

    if config.verbose {
        for (i, file) in files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}
