//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::config::Settings;
use crate::core::ByteOrder;
use crate::error::{AnalysisError, AnalysisResult};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入文件或目录（目录会被递归展开）
    pub inputs: Vec<PathBuf>,

    /// 是否显示详细信息
    pub verbose: bool,

    /// 输出文件路径（可选）
    pub output_path: Option<PathBuf>,

    /// 以JSON格式输出报告
    pub json: bool,

    /// 目录展开时的扩展名过滤（不含点，大小写不敏感）
    pub extension: Option<String>,

    /// 分析参数
    pub settings: Settings,
}

/// 构建命令行定义
pub fn build_command() -> Command {
    Command::new("neutron-multiplicity")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("INPUT")
                .help("事件文件或目录路径（目录递归展开） / Event files or directories")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出结果到文件")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("以JSON格式输出报告 / Emit the report as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON配置文件 / JSON settings file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("min-energy")
                .long("min-energy")
                .help("能量窗口下限（含） / Inclusive lower amplitude bound")
                .value_name("AMPLITUDE")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("max-energy")
                .long("max-energy")
                .help("能量窗口上限（含） / Inclusive upper amplitude bound")
                .value_name("AMPLITUDE")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("byte-order")
                .long("byte-order")
                .help("记录字节序 / Byte order of the recording hardware")
                .value_parser(["little", "big", "native"]),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .short('e')
                .help("目录展开时只保留该扩展名 / Only keep files with this extension")
                .value_name("EXT"),
        )
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> AnalysisResult<AppConfig> {
    config_from_matches(&build_command().get_matches())
}

/// 从给定参数解析（便于测试）
pub fn parse_args_from<I, T>(args: I) -> AnalysisResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;
    config_from_matches(&matches)
}

fn config_from_matches(matches: &ArgMatches) -> AnalysisResult<AppConfig> {
    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::default(),
    };

    // 命令行覆盖配置文件
    if let Some(&min) = matches.get_one::<u8>("min-energy") {
        settings.min_neutron_energy = min;
    }
    if let Some(&max) = matches.get_one::<u8>("max-energy") {
        settings.max_neutron_energy = max;
    }
    if let Some(order) = matches.get_one::<String>("byte-order") {
        settings.byte_order = order
            .parse::<ByteOrder>()
            .map_err(AnalysisError::InvalidInput)?;
    }
    settings.validate()?;

    let inputs = matches
        .get_many::<String>("INPUT")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    Ok(AppConfig {
        inputs,
        verbose: matches.get_flag("verbose"),
        output_path: matches.get_one::<String>("output").map(PathBuf::from),
        json: matches.get_flag("json"),
        extension: matches
            .get_one::<String>("extension")
            .map(|ext| ext.trim_start_matches('.').to_lowercase()),
        settings,
    })
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("Neutron Multiplicity Analyzer v{VERSION}");
    println!("{DESCRIPTION}");
    if config.verbose {
        println!(
            "[INFO] 能量窗口 / Amplitude window: [{}, {}], 字节序 / byte order: {:?}",
            config.settings.min_neutron_energy,
            config.settings.max_neutron_energy,
            config.settings.byte_order
        );
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("[OK] 所有任务处理完成 / All tasks completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let config = parse_args_from(["neutron-multiplicity"]).unwrap();
        assert!(config.inputs.is_empty());
        assert!(!config.verbose);
        assert!(!config.json);
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_multiple_inputs_keep_order() {
        let config = parse_args_from(["nm", "b.dat", "a.dat", "runs/"]).unwrap();
        assert_eq!(
            config.inputs,
            vec![
                PathBuf::from("b.dat"),
                PathBuf::from("a.dat"),
                PathBuf::from("runs/")
            ]
        );
    }

    #[test]
    fn test_energy_overrides() {
        let config = parse_args_from([
            "nm",
            "--min-energy",
            "40",
            "--max-energy",
            "200",
            "--byte-order",
            "big",
            "-e",
            ".DAT",
            "run.dat",
        ])
        .unwrap();
        assert_eq!(config.settings.min_neutron_energy, 40);
        assert_eq!(config.settings.max_neutron_energy, 200);
        assert_eq!(config.settings.byte_order, ByteOrder::Big);
        assert_eq!(config.extension.as_deref(), Some("dat"));
    }

    #[test]
    fn test_inverted_window_is_config_error() {
        let err = parse_args_from(["nm", "--min-energy", "200", "--max-energy", "100"])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigError(_)));
    }

    #[test]
    fn test_out_of_range_amplitude_rejected() {
        let err = parse_args_from(["nm", "--max-energy", "300"]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
