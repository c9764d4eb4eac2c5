use log::info;

use super::GeneratorPhase;
use crate::errors::{ErrorReport, GenerationError};
use crate::grid::LessonSlot;
use crate::schedule::Schedule;
use crate::teacher::TeacherLoadKey;

/// Tops up every obligation still short of hours by trying each slot of
/// each typed day in order, until the hours are met or the term runs out.
#[derive(Debug, Clone, Default)]
pub struct MissingLessonsAdder;

impl MissingLessonsAdder {
    pub fn new() -> Self {
        Self
    }
}

impl GeneratorPhase for MissingLessonsAdder {
    fn name(&self) -> &'static str {
        "missing lessons adder"
    }

    fn run(&mut self, schedule: &mut Schedule, errors: &mut ErrorReport) {
        let mut added = 0;

        for draft in schedule.obligations().to_vec() {
            let key = TeacherLoadKey::from(&draft);
            let satisfied = |schedule: &Schedule| schedule.teacher(draft.teacher).is_enough_lessons_for(&key);

            let mut next = schedule.group(draft.group).next_day_of_type(draft.lesson_type, 0);
            while let Some(day) = next {
                if satisfied(schedule) {
                    break;
                }
                for slot in 0..schedule.group(draft.group).grid().nslots(day) {
                    if satisfied(schedule) {
                        break;
                    }
                    if schedule.assign_lesson(&draft, LessonSlot::new(day, slot)).is_ok() {
                        added += 1;
                    }
                }
                next = schedule
                    .group(draft.group)
                    .next_day_of_type(draft.lesson_type, day + 1);
            }

            let missing = schedule
                .teacher(draft.teacher)
                .load(&key)
                .map_or(0, |ledger| ledger.hour_deficit());
            if missing > 0 {
                errors.add_error(GenerationError::HourDeficit {
                    label: schedule.label(&draft),
                    missing,
                });
            }
        }

        info!("added {added} missing lessons");
    }
}
