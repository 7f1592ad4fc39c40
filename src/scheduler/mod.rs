mod candidate_finder;
mod flow_network;
mod flow_solver;
mod grid_builder;
mod lesson_extractor;

pub use candidate_finder::*;
pub use flow_network::*;
pub use flow_solver::*;
pub use grid_builder::*;
pub use lesson_extractor::*;

use crate::error::{Result, SchedulerError};
use crate::store::ScheduleStore;
use crate::types::{GeneratedSchedule, ScheduleId, ScheduleRecord, SolverOptions};
use indicatif::{ProgressBar, ProgressStyle};

/// Look up a schedule through the persistence collaborator and run the
/// engine on it
pub fn generate_for_schedule(
    store: &dyn ScheduleStore,
    id: ScheduleId,
    options: &SolverOptions,
    quiet: bool,
) -> Result<GeneratedSchedule> {
    let record = store
        .find_schedule(id)?
        .ok_or_else(|| SchedulerError::ScheduleNotFound { id: id.to_string() })?;
    generate_lessons(&record, options, quiet)
}

/// Main entry point for lesson generation
pub fn generate_lessons(
    record: &ScheduleRecord,
    options: &SolverOptions,
    quiet: bool,
) -> Result<GeneratedSchedule> {
    if let Some(teacher_id) = options.teacher_id {
        if teacher_id != record.teacher_id {
            return Err(SchedulerError::NotAuthorized {
                teacher_id: teacher_id.0,
                schedule_id: record.id.0,
            }
            .into());
        }
    }
    if options.buffer_minutes < 0 {
        return Err(SchedulerError::InvalidBuffer {
            minutes: options.buffer_minutes,
        }
        .into());
    }
    if record.students.is_empty() {
        return Ok(GeneratedSchedule::empty(Vec::new()));
    }

    let slot_minutes = resolve_slot_minutes(options, &record.students)?;
    let required_slots = required_slot_counts(&record.students, slot_minutes)?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    };

    // Phase 1: Slot grid
    progress.set_message("Building slot grid...");
    progress.set_position(10);
    let grid = build_slot_grid(&record.availabilities, &record.dates, record.teacher_id);
    if grid.is_empty() {
        progress.finish_with_message("No teacher slots");
        return Ok(GeneratedSchedule::empty(record.student_ids()));
    }

    // Phase 2: Candidates
    progress.set_message("Enumerating candidates...");
    progress.set_position(30);
    let plan = enumerate_candidates(&grid, &record.students, &required_slots, slot_minutes);
    if plan.is_empty() {
        progress.finish_with_message("No feasible candidates");
        return Ok(GeneratedSchedule::empty(record.student_ids()));
    }

    // Phase 3: Network
    progress.set_message("Assembling flow network...");
    progress.set_position(50);
    let mut network = assemble_network(&plan, record.students.len(), options);

    // Phase 4: Min-cost flow
    progress.set_message("Solving min-cost flow...");
    progress.set_position(70);
    let outcome = solve(&mut network, record.students.len() as i64)?;

    // Phase 5: Extraction
    progress.set_message("Extracting lessons...");
    progress.set_position(90);
    let (lessons, unscheduled_student_ids) =
        extract_lessons(&network, &plan, &record.students, options.buffer_minutes);

    progress.set_position(100);
    progress.finish_with_message("Schedule generated");

    Ok(GeneratedSchedule {
        scheduled_count: lessons.len(),
        lessons,
        unscheduled_student_ids,
        objective_cost: outcome.cost,
    })
}
