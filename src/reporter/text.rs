use crate::types::{GeneratedSchedule, ScheduleRecord};
use crate::validator::ValidationReport;
use colored::Colorize;
use itertools::Itertools;

/// Generate a plain-text report of the generated lessons
pub fn generate_text_report(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
    validation: &ValidationReport,
) -> String {
    let mut lines = vec![
        format!("Lessons for {}", record.title),
        "=".repeat(40),
        format!(
            "{} of {} students scheduled over {} day(s), cost {}",
            validation.statistics.scheduled,
            validation.statistics.total_students,
            validation.statistics.days_used,
            result.objective_cost
        ),
        String::new(),
    ];

    for (day, lessons) in &result.lessons.iter().group_by(|l| l.day) {
        lines.push(format!("{day}"));
        for lesson in lessons {
            lines.push(format!(
                "  {} - {}  {}",
                lesson.start_time.format("%H:%M"),
                lesson.end_time.format("%H:%M"),
                lesson.student_name
            ));
        }
        lines.push(String::new());
    }

    if !result.unscheduled_student_ids.is_empty() {
        lines.push("Unscheduled:".to_string());
        for id in &result.unscheduled_student_ids {
            let name = record
                .student(*id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown");
            lines.push(format!("  {} ({})", name, id));
        }
    }

    lines.join("\n")
}

/// Print a colored summary to stdout
pub fn print_summary(result: &GeneratedSchedule, validation: &ValidationReport) {
    println!();
    println!("{}", "Schedule Summary".bold().cyan());
    println!("{}", "─".repeat(40));
    println!(
        "Scheduled: {} / {}",
        validation.statistics.scheduled.to_string().green().bold(),
        validation.statistics.total_students
    );
    println!("Days used: {}", validation.statistics.days_used);
    println!("Objective cost: {}", result.objective_cost);

    if validation.is_valid {
        println!("{}", "✓ All invariants hold".green());
    } else {
        println!("{}", "✗ Invariant violations".red().bold());
        for violation in &validation.violations {
            println!("  - {}: {}", violation.constraint.red(), violation.message);
        }
    }

    if !result.unscheduled_student_ids.is_empty() {
        println!(
            "{} {}",
            "Unscheduled student ids:".yellow(),
            result
                .unscheduled_student_ids
                .iter()
                .map(|id| id.to_string())
                .join(", ")
        );
    }
}
