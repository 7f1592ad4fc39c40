use crate::error::Result;
use crate::types::GeneratedSchedule;

/// Generate JSON report of the generated lessons
pub fn generate_json_report(result: &GeneratedSchedule) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Summary statistics as JSON
#[derive(serde::Serialize)]
pub struct JsonSummary {
    pub scheduled_count: usize,
    pub unscheduled_count: usize,
    pub days_used: usize,
    pub objective_cost: i64,
}

pub fn generate_json_summary(result: &GeneratedSchedule) -> Result<String> {
    let summary = JsonSummary {
        scheduled_count: result.scheduled_count,
        unscheduled_count: result.unscheduled_student_ids.len(),
        days_used: result.used_days().len(),
        objective_cost: result.objective_cost,
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}
