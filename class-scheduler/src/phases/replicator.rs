use log::{debug, info};

use super::GeneratorPhase;
use crate::errors::ErrorReport;
use crate::grid::LessonSlot;
use crate::schedule::Schedule;

/// Repeats the seed week's lessons in every other week of the term.
///
/// A lesson of the seed window is replayed on the same weekday and slot of
/// every calendar week, itself excepted.
///
/// Replays that are rejected for a later week are skipped; the gap filler
/// picks up whatever hours are still missing. The pass ends at the first
/// replay that falls past the last day of the term.
#[derive(Debug, Clone)]
pub struct Replicator {
    seed_week: usize,
}

impl Replicator {
    pub fn new(seed_week: usize) -> Self {
        Self { seed_week }
    }
}

impl GeneratorPhase for Replicator {
    fn name(&self) -> &'static str {
        "replicator"
    }

    fn run(&mut self, schedule: &mut Schedule, _errors: &mut ErrorReport) {
        let window = schedule.term().seed_days(self.seed_week).unwrap_or(0..0);
        let mut seed: Vec<_> = schedule
            .lessons()
            .iter()
            .filter(|lesson| window.contains(&lesson.slot().day))
            .copied()
            .collect();
        // day order within a week: the first replay past the term ends it
        seed.sort_by_key(|lesson| (lesson.slot().weekday(), lesson.slot().slot));
        if seed.is_empty() {
            info!("seed week {} is empty, nothing to replicate", self.seed_week);
            return;
        }

        let mut placed = 0;
        let mut skipped = 0;
        'weeks: for week in 0..schedule.term().nweeks() {
            for lesson in &seed {
                let slot = LessonSlot::new(lesson.slot().weekday() + week * 7, lesson.slot().slot);
                if slot.day == lesson.slot().day {
                    continue;
                }
                match schedule.assign_lesson(lesson.draft(), slot) {
                    Ok(_) => placed += 1,
                    Err(e) if e.is_out_of_grid() => break 'weeks,
                    Err(e) => {
                        skipped += 1;
                        debug!("not replicated to {slot}: {e}");
                    }
                }
            }
        }

        info!("replicated {placed} lessons, {skipped} replays rejected");
    }
}
