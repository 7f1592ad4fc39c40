mod json;
mod markdown;
mod text;

pub use json::*;
pub use markdown::*;
pub use text::*;

use crate::error::Result;
use crate::types::{GeneratedSchedule, ScheduleRecord};
use crate::validator::ValidationReport;
use std::fs;
use std::path::Path;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

/// Generate all reports and write to output directory
pub fn generate_reports(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
    validation: &ValidationReport,
    output_dir: &Path,
    formats: &[OutputFormat],
) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    for format in formats {
        match format {
            OutputFormat::Json => {
                let json = generate_json_report(result)?;
                fs::write(output_dir.join("lessons.json"), json)?;
            }
            OutputFormat::Markdown => {
                let md = generate_markdown_report(result, record, validation);
                fs::write(output_dir.join("lessons.md"), md)?;
            }
            OutputFormat::Text => {
                let txt = generate_text_report(result, record, validation);
                fs::write(output_dir.join("lessons.txt"), txt)?;
            }
        }
    }

    Ok(())
}
