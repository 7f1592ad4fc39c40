use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lesson_scheduler::scheduler::generate_lessons;
use lesson_scheduler::types::{
    Availability, ScheduleId, ScheduleRecord, SolverOptions, Student, StudentId, TeacherId,
};
use chrono::{Duration, NaiveDate};

const TEACHER: TeacherId = TeacherId(1);

fn busy_week() -> ScheduleRecord {
    let mut availabilities = Vec::new();
    let mut dates = Vec::new();
    for d in 0..3u32 {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4 + d).unwrap();
        dates.push(date);
        let open = date.and_hms_opt(9, 0, 0).unwrap();
        for k in 0..12 {
            availabilities.push(Availability::teacher(
                open + Duration::minutes(30 * k),
                TEACHER,
            ));
        }
    }

    let mut students = Vec::new();
    for s in 0..10i64 {
        let id = StudentId(s + 1);
        students.push(Student {
            id,
            name: format!("Student {}", s + 1),
            lesson_length: if s % 3 == 0 { 60 } else { 30 },
        });
        // Each student accepts a sliding window of slots on two of the days
        for d in 0..2u32 {
            let date = NaiveDate::from_ymd_opt(2024, 3, 4 + (d + s as u32) % 3).unwrap();
            let open = date.and_hms_opt(9, 0, 0).unwrap();
            for k in 0..6 {
                availabilities.push(Availability::student(
                    open + Duration::minutes(30 * ((s as i64 + k) % 12)),
                    id,
                ));
            }
        }
    }

    ScheduleRecord {
        id: ScheduleId(1),
        slug: "bench".to_string(),
        title: "Bench Week".to_string(),
        teacher_id: TEACHER,
        dates,
        students,
        availabilities,
        is_finalized: false,
        finalized_at: None,
    }
}

fn bench_generate(c: &mut Criterion) {
    let record = busy_week();
    let options = SolverOptions {
        slot_minutes: Some(30),
        ..Default::default()
    };

    c.bench_function("generate_lessons 3 days / 10 students", |b| {
        b.iter(|| generate_lessons(black_box(&record), black_box(&options), true).unwrap())
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
