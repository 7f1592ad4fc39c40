use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lesson_scheduler::reporter::{generate_reports, print_summary, OutputFormat};
use lesson_scheduler::scheduler::generate_lessons;
use lesson_scheduler::store::{
    load_options_or_default, validate_record, JsonScheduleStore, ScheduleStore,
};
use lesson_scheduler::types::{ScheduleId, SolverOptions, TeacherId};
use lesson_scheduler::validator::validate_lessons;
use lesson_scheduler::SchedulerError;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lesson-scheduler")]
#[command(about = "Availability-driven private lesson scheduler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run demo with sample data
    Demo,

    /// Generate lessons for a schedule
    Generate {
        /// Directory containing schedules.json (and optional solver.toml)
        #[arg(short, long)]
        data: PathBuf,

        /// Schedule id or slug to solve
        #[arg(short, long)]
        schedule: String,

        /// Output directory for lesson files
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Output format(s): json, markdown, text, or all
        #[arg(short, long, default_value = "all")]
        format: String,

        /// Suppress progress output, print JSON summary only
        #[arg(short, long)]
        quiet: bool,

        /// Uniform slot length in minutes
        #[arg(long)]
        slot_minutes: Option<i64>,

        /// Minutes appended to each lesson's end
        #[arg(long)]
        buffer_minutes: Option<i64>,

        /// Fixed cost for using a day at all
        #[arg(long)]
        day_open_cost: Option<i64>,

        /// Quadratic slot-position cost multiplier
        #[arg(long)]
        gap_penalty: Option<i64>,

        /// Require this teacher to own the schedule
        #[arg(long)]
        teacher_id: Option<i64>,
    },

    /// Validate generated lessons against their schedule
    Validate {
        /// Directory containing schedules.json
        #[arg(short, long)]
        data: PathBuf,

        /// Schedule id or slug the lessons belong to
        #[arg(short, long)]
        schedule: String,

        /// Path to lessons.json
        #[arg(short, long)]
        lessons: PathBuf,

        /// Show detailed validation results
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::Generate {
            data,
            schedule,
            output,
            format,
            quiet,
            slot_minutes,
            buffer_minutes,
            day_open_cost,
            gap_penalty,
            teacher_id,
        } => {
            let mut options = load_options_or_default(&data);
            if slot_minutes.is_some() {
                options.slot_minutes = slot_minutes;
            }
            if let Some(buffer) = buffer_minutes {
                options.buffer_minutes = buffer;
            }
            if let Some(cost) = day_open_cost {
                options.day_open_cost = cost;
            }
            if let Some(penalty) = gap_penalty {
                options.gap_penalty = penalty;
            }
            if let Some(id) = teacher_id {
                options.teacher_id = Some(TeacherId(id));
            }
            run_generate(&data, &schedule, &output, &format, quiet, &options)
        }
        Commands::Validate {
            data,
            schedule,
            lessons,
            verbose,
        } => run_validate(&data, &schedule, &lessons, verbose),
    }
}

fn find_record(
    store: &JsonScheduleStore,
    schedule: &str,
) -> Result<lesson_scheduler::types::ScheduleRecord> {
    let record = match schedule.parse::<i64>() {
        Ok(id) => store.find_schedule(ScheduleId(id))?,
        Err(_) => store.find_schedule_by_slug(schedule)?,
    };
    record.ok_or_else(|| {
        SchedulerError::ScheduleNotFound {
            id: schedule.to_string(),
        }
        .into()
    })
}

fn run_generate(
    data: &PathBuf,
    schedule: &str,
    output: &PathBuf,
    format: &str,
    quiet: bool,
    options: &SolverOptions,
) -> Result<()> {
    let store = JsonScheduleStore::load_dir(data).context("Failed to load schedule data")?;
    let record = find_record(&store, schedule)?;

    if !quiet {
        let validation = validate_record(&record)?;
        for warning in &validation.warnings {
            println!("{} {}", "Warning:".yellow(), warning);
        }
        println!(
            "Loaded schedule '{}' with {} students and {} availability rows",
            record.title,
            record.students.len(),
            record.availabilities.len()
        );
    }

    let started = Instant::now();
    let result = generate_lessons(&record, options, quiet)?;
    let elapsed = started.elapsed();

    let validation = validate_lessons(&result, &record, options);
    generate_reports(&result, &record, &validation, output, &parse_formats(format))?;

    if quiet {
        println!(
            "{}",
            lesson_scheduler::reporter::generate_json_summary(&result)?
        );
    } else {
        print_summary(&result, &validation);
        println!("Solved in {}ms", elapsed.as_millis());
        println!(
            "Reports written to: {}",
            output.display().to_string().green()
        );
    }

    Ok(())
}

fn run_validate(data: &PathBuf, schedule: &str, lessons: &PathBuf, verbose: bool) -> Result<()> {
    let store = JsonScheduleStore::load_dir(data)?;
    let record = find_record(&store, schedule)?;
    let options = load_options_or_default(data);

    let content = std::fs::read_to_string(lessons)?;
    let result: lesson_scheduler::types::GeneratedSchedule = serde_json::from_str(&content)?;

    let validation = validate_lessons(&result, &record, &options);

    if validation.is_valid {
        println!("{}", "✓ Lessons are valid".green().bold());
    } else {
        println!("{}", "✗ Lessons have violations".red().bold());
        for v in &validation.violations {
            println!("  - {}: {}", v.constraint.red(), v.message);
        }
    }

    if verbose {
        println!("\n{}", "Statistics:".bold());
        println!("  Students: {}", validation.statistics.total_students);
        println!("  Scheduled: {}", validation.statistics.scheduled);
        println!("  Unscheduled: {}", validation.statistics.unscheduled);
        println!("  Days used: {}", validation.statistics.days_used);
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("{}", "Lesson Scheduler Demo".bold().cyan());
    println!("{}", "─".repeat(40));

    let demo_path = PathBuf::from("data/demo");
    let output_path = PathBuf::from("output");

    if !demo_path.join("schedules.json").exists() {
        println!(
            "{}",
            "Demo data not found. Creating sample data...".yellow()
        );
        create_demo_data(&demo_path)?;
    }

    run_generate(
        &demo_path,
        "spring-studio",
        &output_path,
        "all",
        false,
        &load_options_or_default(&demo_path),
    )
}

fn create_demo_data(path: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(path)?;

    let schedules = serde_json::json!([
        {
            "id": 1,
            "slug": "spring-studio",
            "title": "Spring Studio Week",
            "teacher_id": 1,
            "dates": ["2024-03-04", "2024-03-05"],
            "students": [
                {"id": 1, "name": "Ada Lovelace", "lesson_length": 60},
                {"id": 2, "name": "Grace Hopper", "lesson_length": 30},
                {"id": 3, "name": "Edsger Dijkstra", "lesson_length": 30},
                {"id": 4, "name": "Barbara Liskov", "lesson_length": 30}
            ],
            "availabilities": [
                {"start_time": "2024-03-04T09:00:00", "teacher_id": 1},
                {"start_time": "2024-03-04T09:30:00", "teacher_id": 1},
                {"start_time": "2024-03-04T10:00:00", "teacher_id": 1},
                {"start_time": "2024-03-04T10:30:00", "teacher_id": 1},
                {"start_time": "2024-03-05T09:00:00", "teacher_id": 1},
                {"start_time": "2024-03-05T09:30:00", "teacher_id": 1},
                {"start_time": "2024-03-04T09:00:00", "student_id": 1},
                {"start_time": "2024-03-04T09:30:00", "student_id": 1},
                {"start_time": "2024-03-04T10:00:00", "student_id": 2},
                {"start_time": "2024-03-05T09:00:00", "student_id": 2},
                {"start_time": "2024-03-04T10:30:00", "student_id": 3},
                {"start_time": "2024-03-05T09:30:00", "student_id": 3},
                {"start_time": "2024-03-05T09:00:00", "student_id": 4}
            ]
        }
    ]);
    std::fs::write(
        path.join("schedules.json"),
        serde_json::to_string_pretty(&schedules)?,
    )?;

    std::fs::write(
        path.join("solver.toml"),
        "slot_minutes = 30\nbuffer_minutes = 0\nday_open_cost = 10000\ngap_penalty = 5\n",
    )?;

    println!("{}", "Demo data created successfully!".green());
    Ok(())
}

fn parse_formats(format: &str) -> Vec<OutputFormat> {
    if format == "all" {
        return vec![OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Text];
    }

    format
        .split(',')
        .filter_map(|f| match f.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "text" | "txt" => Some(OutputFormat::Text),
            _ => None,
        })
        .collect()
}
