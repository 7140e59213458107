//! 输出格式化模块
//!
//! 负责多重性报告的文本/JSON格式化以及结果文件写入。

use super::cli::AppConfig;
use super::constants::report::{RATIO_PRECISION, SEPARATOR};
use super::utils;
use crate::error::{AnalysisError, AnalysisResult};
use crate::processing::ProcessingOutcome;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::path::Path;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON报告外层结构
#[derive(Serialize)]
struct JsonReport<'a> {
    tool_version: &'static str,
    generated_at: String,
    min_neutron_energy: u8,
    max_neutron_energy: u8,
    #[serde(flatten)]
    outcome: &'a ProcessingOutcome,
}

/// 多重性表
pub fn format_multiplicity_table(outcome: &ProcessingOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Multiplicity / 多重性", "Acts / 裂变数"]);

    for row in &outcome.report.rows {
        table.add_row(vec![
            Cell::new(row.multiplicity).set_alignment(CellAlignment::Right),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// 生成文本报告
pub fn render_text_report(outcome: &ProcessingOutcome, config: &AppConfig) -> String {
    let mut output = String::new();
    let report = &outcome.report;

    output.push_str(&format!("Neutron Multiplicity Analyzer v{VERSION}\n"));
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    output.push_str(&format!("log date: {now}\n\n"));

    output.push_str(SEPARATOR);
    output.push('\n');
    output.push_str(&format!(
        "Amplitude window: [{}, {}]\n",
        config.settings.min_neutron_energy, config.settings.max_neutron_energy
    ));
    output.push_str(&format!("Files processed: {}\n", outcome.files.len()));
    for file in &outcome.files {
        output.push_str(&format!(
            "   {}  records: {}  in-window: {}  acts: {}",
            utils::extract_filename_lossy(&file.path),
            file.record_count,
            file.accepted_events,
            file.closed_acts
        ));
        if file.trailing_bytes > 0 {
            output.push_str(&format!("  [truncated: {} trailing bytes]", file.trailing_bytes));
        }
        if file.cancelled {
            output.push_str("  [cancelled]");
        }
        output.push('\n');
    }
    if outcome.cancelled {
        output.push_str("Run cancelled: partial results / 运行已取消：部分结果\n");
    }
    output.push_str(SEPARATOR);
    output.push_str("\n\n");

    if report.rows.is_empty() {
        output.push_str("No closed fission acts / 没有已关闭的裂变事件\n");
    } else {
        output.push_str(&format_multiplicity_table(outcome).to_string());
        output.push('\n');
    }
    output.push('\n');

    let r = &report.ratios;
    output.push_str(&format!("n2/n3: {:.prec$}\n", r.ratio_2_3, prec = RATIO_PRECISION));
    output.push_str(&format!("n3/n4: {:.prec$}\n", r.ratio_3_4, prec = RATIO_PRECISION));
    output.push_str(&format!("n2/n4: {:.prec$}\n\n", r.ratio_2_4, prec = RATIO_PRECISION));

    output.push_str(&format!("Total events: {}\n", report.total_events));
    output.push_str(&format!("Total acts: {}\n", report.total_acts));
    output.push_str(&format!(
        "Mean multiplicity: {:.prec$}\n",
        report.mean_multiplicity,
        prec = RATIO_PRECISION
    ));
    output.push_str(&format!(
        "Elapsed: {}\n",
        utils::format_elapsed(report.elapsed_seconds)
    ));

    output
}

/// 生成JSON报告
pub fn render_json_report(outcome: &ProcessingOutcome, config: &AppConfig) -> AnalysisResult<String> {
    let wrapper = JsonReport {
        tool_version: VERSION,
        generated_at: chrono::Local::now().to_rfc3339(),
        min_neutron_energy: config.settings.min_neutron_energy,
        max_neutron_energy: config.settings.max_neutron_energy,
        outcome,
    };
    serde_json::to_string_pretty(&wrapper)
        .map_err(|e| AnalysisError::InvalidInput(format!("JSON序列化失败 / JSON encoding failed: {e}")))
}

/// 写入结果文件
pub fn write_output(path: &Path, content: &str) -> AnalysisResult<()> {
    std::fs::write(path, content).map_err(|source| AnalysisError::OutputFailure {
        path: path.to_path_buf(),
        source,
    })
}
