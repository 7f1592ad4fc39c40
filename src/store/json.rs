use super::ScheduleStore;
use crate::error::{Result, SchedulerError};
use crate::types::{ScheduleId, ScheduleRecord, SolverOptions};
use std::fs;
use std::path::Path;

/// JSON-file-backed schedule store.
///
/// A data directory holds `schedules.json` (an array of schedule records)
/// and, optionally, `solver.toml` with default solver options.
#[derive(Debug, Clone, Default)]
pub struct JsonScheduleStore {
    schedules: Vec<ScheduleRecord>,
}

impl JsonScheduleStore {
    /// Load all schedules from a data directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let path = dir.join("schedules.json");
        let path_str = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| SchedulerError::FileRead {
            path: path_str.clone(),
            source: e,
        })?;
        Self::from_json(&content, &path_str)
    }

    /// Parse a store from raw JSON (an array of schedule records)
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        let schedules: Vec<ScheduleRecord> =
            serde_json::from_str(content).map_err(|e| SchedulerError::JsonParse {
                file: origin.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { schedules })
    }

    pub fn schedules(&self) -> &[ScheduleRecord] {
        &self.schedules
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn find_schedule(&self, id: ScheduleId) -> Result<Option<ScheduleRecord>> {
        Ok(self.schedules.iter().find(|s| s.id == id).cloned())
    }

    fn find_schedule_by_slug(&self, slug: &str) -> Result<Option<ScheduleRecord>> {
        Ok(self.schedules.iter().find(|s| s.slug == slug).cloned())
    }
}

/// Load solver options from `solver.toml` in the data directory, or defaults
pub fn load_options_or_default(dir: &Path) -> SolverOptions {
    let path = dir.join("solver.toml");
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => SolverOptions::default(),
        }
    } else {
        SolverOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "slug": "spring-studio",
            "title": "Spring Studio",
            "teacher_id": 7,
            "dates": ["2024-01-01"],
            "students": [{"id": 1, "name": "Ada Lovelace", "lesson_length": 60}],
            "availabilities": [
                {"start_time": "2024-01-01T09:00:00", "teacher_id": 7},
                {"start_time": "2024-01-01T09:00:00", "student_id": 1}
            ]
        }
    ]"#;

    #[test]
    fn test_finds_by_id_and_slug() {
        let store = JsonScheduleStore::from_json(SAMPLE, "test").unwrap();

        let by_id = store.find_schedule(ScheduleId(1)).unwrap().unwrap();
        assert_eq!(by_id.slug, "spring-studio");
        assert_eq!(by_id.students.len(), 1);
        assert_eq!(by_id.availabilities.len(), 2);

        let by_slug = store.find_schedule_by_slug("spring-studio").unwrap().unwrap();
        assert_eq!(by_slug.id, ScheduleId(1));

        assert!(store.find_schedule(ScheduleId(99)).unwrap().is_none());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = JsonScheduleStore::from_json("{not json", "broken").unwrap_err();
        let parse = err.downcast_ref::<SchedulerError>().unwrap();
        assert!(matches!(parse, SchedulerError::JsonParse { .. }));
    }
}
