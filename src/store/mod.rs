mod json;
mod validation;

pub use json::*;
pub use validation::*;

use crate::error::Result;
use crate::types::{ScheduleId, ScheduleRecord};

/// Persistence collaborator consumed by the engine's entry point.
///
/// The engine never touches the backing storage directly; the service layer
/// hands it whatever implements this trait.
pub trait ScheduleStore {
    fn find_schedule(&self, id: ScheduleId) -> Result<Option<ScheduleRecord>>;

    fn find_schedule_by_slug(&self, slug: &str) -> Result<Option<ScheduleRecord>>;
}
