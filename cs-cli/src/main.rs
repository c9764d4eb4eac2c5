mod logger;

use std::fs;

use clap::Parser;
use log::{error, info};

use class_scheduler::{Generator, Instance, Schedule, ScheduleReport};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Parser)]
#[command(about = "Generate weekly class timetables for JSON instances")]
struct Args {
    #[arg(long = "improve", help = "Run local search after the greedy phases")]
    improve: bool,
    #[arg(
        short = 'l',
        long = "step-limit",
        help = "Maximum number of local search steps"
    )]
    step_limit: Option<usize>,
    #[arg(
        short = 'w',
        long = "seed-week",
        help = "Week replicated over the term (overrides the instance)"
    )]
    seed_week: Option<usize>,
    #[arg(long = "json", help = "Print full reports as JSON")]
    json: bool,
    #[arg(short = 'v', action = clap::ArgAction::Count, help = "Raise log verbosity")]
    verbose: u8,
    #[arg(help = "JSON file containing problem instances")]
    instances_file: String,
}

fn print_summary(instance: &Instance, schedule: &Schedule, report: &ScheduleReport) {
    println!("Processing instance: {}", instance.id);
    println!("  Lessons: {}", report.lessons.len());
    println!("  {}", report.fault);
    if !report.errors.is_empty() {
        println!("  Errors:");
        for e in &report.errors {
            println!("    [{}] {}", e.kind, e.message);
        }
    }

    let seed_week = instance.generator.seed_week;
    println!("  Week {seed_week}:");
    for id in schedule.week_lessons(seed_week) {
        let lesson = schedule.lesson(id);
        let slot = lesson.slot();
        let date = schedule
            .term()
            .date_of(slot.day)
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "    {} {date} #{}: {}",
            WEEKDAYS[slot.weekday()],
            slot.slot,
            schedule.label(lesson.draft())
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init(args.verbose)?;

    let file_contents = fs::read_to_string(&args.instances_file)?;
    let instances: Vec<Instance> = serde_json::from_str(&file_contents)?;
    info!("{} instances read from {}", instances.len(), args.instances_file);

    let mut reports = Vec::new();
    let mut rejected = 0;
    for mut instance in instances {
        if let Some(seed_week) = args.seed_week {
            instance.generator.seed_week = seed_week;
        }
        if args.improve {
            instance.generator.improve = true;
        }
        if args.step_limit.is_some() {
            instance.generator.improve_step_limit = args.step_limit;
        }

        let mut schedule = match Schedule::from_instance(&instance) {
            Ok(schedule) => schedule,
            Err(e) => {
                error!("instance {} rejected: {e}", instance.id);
                rejected += 1;
                continue;
            }
        };

        let generator = Generator::new(instance.generator.clone());
        let errors = generator.run(&mut schedule);
        let report = ScheduleReport::new(
            &instance.id,
            &mut schedule,
            &generator.config().weights,
            &errors,
        );

        if args.json {
            reports.push(report);
        } else {
            print_summary(&instance, &schedule, &report);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if rejected > 0 {
        return Err(format!("{rejected} instances rejected").into());
    }
    Ok(())
}
