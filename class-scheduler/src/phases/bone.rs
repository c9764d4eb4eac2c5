use log::{debug, info};

use super::GeneratorPhase;
use crate::errors::{ErrorReport, GenerationError};
use crate::grid::LessonSlot;
use crate::schedule::Schedule;

/// Places one lesson per obligation in the seed week.
///
/// For every obligation the first typed day of the seed week (see
/// [`Term::seed_days`](crate::input::Term::seed_days)) with a slot free
/// for both the teacher and the group wins; within that day the slot
/// maximizing the product of both comfort weights is taken.
#[derive(Debug, Clone)]
pub struct BoneGenerator {
    seed_week: usize,
}

impl BoneGenerator {
    pub fn new(seed_week: usize) -> Self {
        Self { seed_week }
    }
}

impl GeneratorPhase for BoneGenerator {
    fn name(&self) -> &'static str {
        "bone generator"
    }

    fn run(&mut self, schedule: &mut Schedule, errors: &mut ErrorReport) {
        // an out-of-term seed week leaves no day to seed on
        let window = schedule.term().seed_days(self.seed_week).unwrap_or(0..0);
        let mut placed = 0;

        for draft in schedule.obligations().to_vec() {
            let mut offset = window.start;
            loop {
                let group = schedule.group(draft.group);
                let day = match group.next_day_of_type(draft.lesson_type, offset) {
                    Some(day) if window.contains(&day) => day,
                    _ => {
                        errors.add_error(GenerationError::SeedWeek {
                            label: schedule.label(&draft),
                        });
                        break;
                    }
                };

                let free = group.free_slots(day);
                let Some(slot) = schedule
                    .teacher(draft.teacher)
                    .grid()
                    .optimal_free_slot(&free, day)
                else {
                    offset = day + 1;
                    continue;
                };

                let slot = LessonSlot::new(day, slot);
                match schedule.assign_lesson(&draft, slot) {
                    Ok(id) => {
                        placed += 1;
                        debug!("seeded {id} at {slot}");
                    }
                    Err(source) => errors.add_error(GenerationError::Unexpected {
                        component: self.name(),
                        operation: "assign lesson",
                        description: "slot is busy but was computed as free".into(),
                        label: schedule.label(&draft),
                        slot,
                        source,
                    }),
                }
                break;
            }
        }

        info!("seed week {}: {placed} lessons placed", self.seed_week);
    }
}
