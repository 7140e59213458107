//! Neutron Multiplicity Analyzer - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成多重性分析任务。

use anyhow::Context;
use neutron_multiplicity::{
    error::{AnalysisError, ErrorCategory},
    processing::{CancellationToken, ChannelObserver, ProgressEvent, StreamProcessor},
    tools::{self, AppConfig, constants::defaults},
};
use std::process;
use std::thread;
use tracing_subscriber::EnvFilter;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/配置错误
    pub const INPUT_ERROR: i32 = 2;
    /// 文件打开/读取失败
    pub const IO_ERROR: i32 = 3;
}

/// 获取错误建议文本
fn get_error_suggestion(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::NoInput => {
            "请指定事件文件或包含事件文件的目录 / Pass event files or a directory containing them"
        }
        ErrorCategory::Io => {
            "检查文件路径是否正确，文件是否存在且可读 / Check if file path is correct, file exists and is readable"
        }
        ErrorCategory::Input => {
            "检查命令行参数和配置文件，使用 --help 查看完整用法 / Check arguments and settings file, use --help to see full usage"
        }
        ErrorCategory::Other => "请检查输出路径和参数设置 / Please check output path and settings",
    }
}

/// 错误处理和建议
fn handle_error(error: anyhow::Error) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");

    let exit_code = match error.downcast_ref::<AnalysisError>() {
        Some(analysis_error) => {
            let category = ErrorCategory::from_analysis_error(analysis_error);
            eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(category));
            match category {
                ErrorCategory::Io => exit_codes::IO_ERROR,
                ErrorCategory::Input => exit_codes::INPUT_ERROR,
                ErrorCategory::NoInput | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
            }
        }
        None => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        defaults::VERBOSE_LOG_FILTER
    } else {
        defaults::LOG_FILTER
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 打印线程：消费进度事件（与处理线程解耦）
fn spawn_progress_printer(
    receiver: crossbeam_channel::Receiver<ProgressEvent>,
    total: usize,
    verbose: bool,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut index = 0;
        for event in receiver {
            match event {
                ProgressEvent::Started(name) => {
                    index += 1;
                    if verbose {
                        println!("[PROCESSING] [{index}/{total}] 处理 / Processing: {name}");
                    }
                }
                ProgressEvent::Finished(name) => {
                    println!("[OK] [{index}/{total}] {name}");
                }
            }
        }
    })
}

/// 执行分析并输出报告
fn analyze(config: &AppConfig) -> anyhow::Result<()> {
    let files = tools::expand_inputs(&config.inputs, config.extension.as_deref())?;
    tools::show_scan_results(config, &files);

    let window = config.settings.amplitude_window()?;
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        eprintln!("\n[WARNING] 收到 Ctrl+C，正在停止 / Received Ctrl+C, stopping...");
        handler_token.cancel();
    })
    .context("无法安装 Ctrl+C 处理器 / failed to install Ctrl+C handler")?;

    let (observer, receiver) = ChannelObserver::new();
    let printer = spawn_progress_printer(receiver, files.len(), config.verbose);

    let result = StreamProcessor::new(window, config.settings.byte_order)
        .with_cancellation(token)
        .with_observer(&observer)
        .run(&files);

    // 关闭通道，等待打印线程输出完剩余进度
    drop(observer);
    let _ = printer.join();

    let outcome = result?;
    if outcome.cancelled {
        println!("[WARNING] 运行已取消，以下为部分结果 / Run cancelled, partial results follow");
    }
    println!();

    let rendered = if config.json {
        tools::render_json_report(&outcome, config)?
    } else {
        tools::render_text_report(&outcome, config)
    };
    println!("{rendered}");

    if let Some(path) = &config.output_path {
        tools::write_output(path, &rendered)?;
        println!("[INFO] 报告已保存 / Report saved: {}", path.display());
    }

    Ok(())
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> anyhow::Result<()> {
    // 1. 解析命令行参数
    let config = tools::parse_args()?;
    init_tracing(config.verbose);

    // 2. 显示启动信息
    tools::show_startup_info(&config);

    // 3. 分析；没有输入文件属于可恢复情况
    match analyze(&config) {
        Ok(()) => {
            tools::show_completion_info(&config);
            Ok(())
        }
        Err(error)
            if matches!(
                error.downcast_ref::<AnalysisError>(),
                Some(AnalysisError::NoInputFiles)
            ) =>
        {
            println!("[WARNING] {error}");
            println!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(ErrorCategory::NoInput));
            Ok(())
        }
        Err(error) => Err(error),
    }
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
