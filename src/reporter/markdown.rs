use crate::types::{GeneratedSchedule, ScheduleRecord};
use crate::validator::ValidationReport;
use itertools::Itertools;

/// Generate a markdown report of the generated lessons
pub fn generate_markdown_report(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
    validation: &ValidationReport,
) -> String {
    let mut lines = vec![
        format!("# Lessons for {}", record.title),
        String::new(),
        "## Summary\n".to_string(),
        "| Metric | Value |".to_string(),
        "|--------|-------|".to_string(),
        format!("| Students | {} |", validation.statistics.total_students),
        format!("| Scheduled | {} |", validation.statistics.scheduled),
        format!("| Unscheduled | {} |", validation.statistics.unscheduled),
        format!("| Days used | {} |", validation.statistics.days_used),
        format!("| Objective cost | {} |", result.objective_cost),
        String::new(),
    ];

    if validation.is_valid {
        lines.push("## Validation: ✅ PASSED\n".to_string());
    } else {
        lines.push("## Validation: ❌ FAILED\n".to_string());
        for violation in &validation.violations {
            lines.push(format!(
                "- **{}**: {}",
                violation.constraint, violation.message
            ));
        }
        lines.push(String::new());
    }

    for (day, lessons) in &result.lessons.iter().group_by(|l| l.day) {
        lines.push(format!("## {}\n", day.format("%A, %B %-d")));
        lines.push("| Start | End | Student |".to_string());
        lines.push("|-------|-----|---------|".to_string());
        for lesson in lessons {
            lines.push(format!(
                "| {} | {} | {} |",
                lesson.start_time.format("%H:%M"),
                lesson.end_time.format("%H:%M"),
                lesson.student_name
            ));
        }
        lines.push(String::new());
    }

    if !result.unscheduled_student_ids.is_empty() {
        lines.push("## Unscheduled\n".to_string());
        for id in &result.unscheduled_student_ids {
            let name = record
                .student(*id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown");
            lines.push(format!("- {} ({})", name, id));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
