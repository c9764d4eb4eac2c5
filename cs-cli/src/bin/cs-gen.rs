use std::fs::File;
use std::io::Write;

use chrono::{Days, NaiveDate};
use clap::Parser;
use fastrand::usize as random_usize;

use class_scheduler::input::{
    DisciplineLoadRecord, DisciplineRecord, LessonTypeRecord, StudentGroupRecord, StudyLoadRecord,
    TeacherRecord, TermConfig,
};
use class_scheduler::{GeneratorConfig, Instance};

const LESSON_VALUE: u32 = 2;

#[derive(Parser)]
#[command(about = "Generate random timetabling instances")]
struct Args {
    #[arg(short, long, help = "Random seed for reproducibility")]
    seed: Option<u64>,
    #[arg(short, long, help = "Number of instances to generate")]
    count: usize,
    #[arg(short, long, help = "Output file for JSON instances")]
    output: String,
    #[arg(long, default_value = "2025-09-07", help = "First day of the term")]
    start: NaiveDate,
    #[arg(name = "weeks", help = "Number of weeks in the term")]
    nweeks: u64,
    #[arg(name = "slots", help = "Number of lesson slots per working day")]
    nslots: usize,
    #[arg(name = "groups", help = "Number of student groups")]
    ngroups: usize,
    #[arg(name = "teachers", help = "Number of teachers")]
    nteachers: usize,
}

/// Monday to Friday get random weights in `[1, 2)`, weekends no slots.
fn random_comfort(nslots: usize) -> Vec<Vec<f32>> {
    (0..7)
        .map(|weekday| match weekday {
            1..=5 => (0..nslots).map(|_| 1.0 + fastrand::f32()).collect(),
            _ => Vec::new(),
        })
        .collect()
}

fn random_weekday() -> usize {
    random_usize(1..=5)
}

fn random_teacher(i: usize) -> TeacherRecord {
    let busy_weekdays = if fastrand::u8(0..4) == 0 {
        vec![random_weekday()]
    } else {
        Vec::new()
    };
    TeacherRecord {
        id: format!("t{i}"),
        name: format!("Teacher {i}"),
        priority: fastrand::i32(0..=10),
        busy_weekdays,
    }
}

fn random_group(i: usize) -> StudentGroupRecord {
    let military_day = (fastrand::u8(0..5) == 0).then(random_weekday);
    StudentGroupRecord {
        id: format!("g{i}"),
        name: format!("Group {i}"),
        max_lessons_per_day: None,
        military_day,
        connected_groups: Vec::new(),
    }
}

/// Each teacher lectures one discipline to a run of consecutive groups
/// and holds practice classes of it with each of them.
fn random_load(teacher: usize, ngroups: usize, nweeks: u64) -> StudyLoadRecord {
    let size = random_usize(1..=ngroups.min(3));
    let first = random_usize(0..=ngroups - size);
    let group_ids: Vec<String> = (first..first + size).map(|g| format!("g{g}")).collect();
    let hours = LESSON_VALUE * nweeks as u32;

    let load = |lesson_type_id: &str| DisciplineLoadRecord {
        discipline_id: format!("d{teacher}"),
        lesson_type_id: lesson_type_id.to_string(),
        group_ids: group_ids.clone(),
        hours,
    };
    StudyLoadRecord {
        teacher_id: format!("t{teacher}"),
        disciplines: vec![load("lecture"), load("practice")],
    }
}

fn random_instance(id: String, args: &Args) -> Result<Instance, Box<dyn std::error::Error>> {
    let end = args
        .start
        .checked_add_days(Days::new(args.nweeks.saturating_mul(7) - 1))
        .ok_or("term end out of range")?;

    Ok(Instance {
        id,
        term: TermConfig {
            start: args.start,
            end,
            comfort: random_comfort(args.nslots),
            lesson_value: LESSON_VALUE,
            max_student_workload: args.nslots.min(4),
        },
        teachers: (0..args.nteachers).map(random_teacher).collect(),
        student_groups: (0..args.ngroups).map(random_group).collect(),
        disciplines: (0..args.nteachers)
            .map(|i| DisciplineRecord {
                id: format!("d{i}"),
                name: format!("Discipline {i}"),
            })
            .collect(),
        lesson_types: vec![
            LessonTypeRecord {
                id: "lecture".into(),
                name: "lecture".into(),
                hours: LESSON_VALUE,
                weeks: Vec::new(),
            },
            LessonTypeRecord {
                id: "practice".into(),
                name: "practice".into(),
                hours: LESSON_VALUE,
                weeks: Vec::new(),
            },
        ],
        study_loads: (0..args.nteachers)
            .map(|t| random_load(t, args.ngroups, args.nweeks))
            .collect(),
        generator: GeneratorConfig::default(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.nweeks == 0 || args.nslots == 0 || args.ngroups == 0 {
        return Err("weeks, slots and groups must be positive".into());
    }
    if let Some(seed) = args.seed {
        fastrand::seed(seed);
    }

    let mut instances = Vec::new();
    for i in 0..args.count {
        instances.push(random_instance(format!("instance_{i:03}"), &args)?);
    }

    let json = serde_json::to_string_pretty(&instances)?;
    let mut file = File::create(&args.output)?;
    file.write_all(json.as_bytes())?;

    println!("Generated {} instances and saved to {}", args.count, args.output);
    Ok(())
}
