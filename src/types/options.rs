use super::TeacherId;
use serde::{Deserialize, Serialize};

/// Tunable knobs for one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Uniform slot length in minutes; when unset it is inferred, which
    /// requires every student to share one lesson length
    #[serde(default)]
    pub slot_minutes: Option<i64>,
    /// Minutes appended to each lesson's end time
    #[serde(default)]
    pub buffer_minutes: i64,
    /// Fixed cost charged the first time any lesson lands on a day
    #[serde(default = "default_day_open_cost")]
    pub day_open_cost: i64,
    /// Cost multiplier for the squared slot position within a day
    #[serde(default = "default_gap_penalty")]
    pub gap_penalty: i64,
    /// When set, the run fails unless this teacher owns the schedule
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
}

fn default_day_open_cost() -> i64 {
    10_000
}

fn default_gap_penalty() -> i64 {
    5
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            slot_minutes: None,
            buffer_minutes: 0,
            day_open_cost: default_day_open_cost(),
            gap_penalty: default_gap_penalty(),
            teacher_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_defaults() {
        let options: SolverOptions = toml::from_str("slot_minutes = 30").unwrap();
        assert_eq!(options.slot_minutes, Some(30));
        assert_eq!(options.buffer_minutes, 0);
        assert_eq!(options.day_open_cost, 10_000);
        assert_eq!(options.gap_penalty, 5);
        assert!(options.teacher_id.is_none());
    }
}
