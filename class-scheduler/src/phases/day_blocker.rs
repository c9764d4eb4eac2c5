use log::{debug, info};

use super::GeneratorPhase;
use crate::errors::{ErrorReport, GenerationError};
use crate::model::GroupId;
use crate::schedule::Schedule;

/// Per-group data computed once before any weekday is bound.
struct GroupDays {
    group: GroupId,
    priorities: [f32; 7],
    free_days: usize,
}

/// Binds weekdays to the lesson types of every student group.
///
/// Groups with the fewest comfortable weekdays choose first. Each pick is
/// the group's still-available free weekday that the fewest groups have
/// taken so far.
#[derive(Debug, Clone)]
pub struct DayBlocker {
    weekdays_per_type: usize,
    free_day_threshold: f32,
}

impl DayBlocker {
    pub fn new(weekdays_per_type: usize, free_day_threshold: f32) -> Self {
        Self {
            weekdays_per_type,
            free_day_threshold,
        }
    }

    fn group_days(&self, schedule: &Schedule) -> Vec<GroupDays> {
        let mut days: Vec<GroupDays> = schedule
            .groups()
            .iter()
            .map(|group| {
                let priorities = group.grid().weekdays_priority();
                let free_days = priorities
                    .iter()
                    .filter(|&&p| p > self.free_day_threshold)
                    .count();
                GroupDays {
                    group: group.id,
                    priorities,
                    free_days,
                }
            })
            .collect();
        days.sort_by_key(|d| d.free_days);
        days
    }
}

impl GeneratorPhase for DayBlocker {
    fn name(&self) -> &'static str {
        "day blocker"
    }

    fn run(&mut self, schedule: &mut Schedule, errors: &mut ErrorReport) {
        let mut usage = [0usize; 7];

        for days in self.group_days(schedule) {
            let mut available: Vec<usize> = (0..7).collect();
            let lesson_types: Vec<_> = schedule.group(days.group).binder().lesson_types().collect();

            for lesson_type in lesson_types {
                let mut bound = 0;
                while bound < self.weekdays_per_type {
                    let pick = available
                        .iter()
                        .copied()
                        .filter(|&day| days.priorities[day] > self.free_day_threshold)
                        .min_by_key(|&day| usage[day]);

                    let Some(weekday) = pick else {
                        errors.add_error(GenerationError::WeekdayAssignment {
                            group: schedule.group(days.group).name.clone(),
                            lesson_type: schedule.lesson_type(lesson_type).name.clone(),
                            free_days: days.free_days,
                        });
                        break;
                    };

                    match schedule.group_mut(days.group).bind_weekday(lesson_type, weekday) {
                        Ok(()) => {
                            usage[weekday] += 1;
                            bound += 1;
                            debug!("{} gets weekday {weekday} for {lesson_type}", days.group);
                        }
                        Err(e) => {
                            debug!("{}: {e}", days.group);
                            available.retain(|&day| day != weekday);
                        }
                    }
                }
            }
        }

        info!("weekday usage across groups: {usage:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::testing::InstanceBuilder;

    fn weekdays(schedule: &Schedule, group: &str, lesson_type: &str) -> Vec<usize> {
        let group = schedule.group(schedule.group_id(group).unwrap());
        let lesson_type = schedule.lesson_type_id(lesson_type).unwrap();
        group
            .binder()
            .binding(lesson_type)
            .unwrap()
            .weekdays()
            .iter()
            .copied()
            .collect()
    }

    #[test]
    fn constrained_groups_choose_first() {
        let mut schedule = InstanceBuilder::new(2, 4)
            .teacher("t")
            .group("wide", None)
            .group("narrow", Some(1))
            .lesson_type("lec", vec![])
            .load("t", "d", "lec", &["wide", "narrow"], 4)
            .schedule();
        let mut errors = ErrorReport::new();
        DayBlocker::new(2, 0.99).run(&mut schedule, &mut errors);

        assert!(errors.is_clear());
        assert_eq!(weekdays(&schedule, "narrow", "lec"), vec![2, 3]);
        assert_eq!(weekdays(&schedule, "wide", "lec"), vec![1, 4]);
    }

    #[test]
    fn taken_weekdays_are_skipped() {
        let mut schedule = InstanceBuilder::new(1, 4)
            .comfort(4, vec![])
            .comfort(5, vec![])
            .teacher("t")
            .group("g", None)
            .lesson_type("lec", vec![])
            .lesson_type("lab", vec![])
            .load("t", "d", "lec", &["g"], 2)
            .load("t", "d", "lab", &["g"], 2)
            .schedule();
        let mut errors = ErrorReport::new();
        DayBlocker::new(2, 0.99).run(&mut schedule, &mut errors);

        assert_eq!(weekdays(&schedule, "g", "lec"), vec![1, 2]);
        assert_eq!(weekdays(&schedule, "g", "lab"), vec![3]);
        assert_eq!(errors.count(ErrorKind::WeekdayAssignment), 1);
    }

    #[test]
    fn uncomfortable_days_are_never_bound() {
        let mut builder = InstanceBuilder::new(1, 3);
        for weekday in 1..6 {
            builder = builder.comfort(weekday, vec![0.5; 3]);
        }
        let mut schedule = builder
            .teacher("t")
            .group("g", None)
            .lesson_type("lec", vec![])
            .load("t", "d", "lec", &["g"], 2)
            .schedule();
        let mut errors = ErrorReport::new();
        DayBlocker::new(2, 0.99).run(&mut schedule, &mut errors);

        assert!(weekdays(&schedule, "g", "lec").is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.errors_of(ErrorKind::WeekdayAssignment)[0],
            GenerationError::WeekdayAssignment { free_days: 0, .. }
        ));
    }

    #[test]
    fn mid_week_start_keeps_early_weekdays_free() {
        // 2025-01-22 is a Wednesday
        let mut schedule = InstanceBuilder::new(16, 4)
            .starting_on(chrono::NaiveDate::from_ymd_opt(2025, 1, 22).unwrap())
            .teacher("t")
            .group("g", None)
            .lesson_type("lec", vec![])
            .lesson_type("lab", vec![])
            .load("t", "d", "lec", &["g"], 2)
            .load("t", "d", "lab", &["g"], 2)
            .schedule();
        let g = schedule.group_id("g").unwrap();
        assert_eq!(schedule.group(g).grid().weekdays_priority()[1], 1.0);

        let mut errors = ErrorReport::new();
        DayBlocker::new(2, 0.99).run(&mut schedule, &mut errors);

        assert!(errors.is_clear());
        assert_eq!(weekdays(&schedule, "g", "lec"), vec![1, 2]);
        assert_eq!(weekdays(&schedule, "g", "lab"), vec![3, 4]);
    }
}
