use log::{debug, info};

use super::GeneratorPhase;
use crate::errors::ErrorReport;
use crate::fault::{FaultWeights, ScheduleFault};
use crate::grid::LessonSlot;
use crate::model::LessonId;
use crate::schedule::Schedule;
use crate::Penalty;

/// Local search over lesson positions.
///
/// Lessons are visited one at a time. The current lesson walks forward
/// through every slot of the term in `(day, slot)` order; a move is kept
/// when it does not raise the fault, otherwise the lesson goes back to its
/// last kept slot and the next lesson is visited.
#[derive(Debug, Clone)]
pub struct Improver {
    weights: FaultWeights,
    step_limit: Option<usize>,
    cursor: usize,
    home: Option<LessonSlot>,
    scan: LessonSlot,
}

impl Improver {
    pub fn new(weights: FaultWeights, step_limit: Option<usize>) -> Self {
        Self {
            weights,
            step_limit,
            cursor: 0,
            home: None,
            scan: LessonSlot::new(0, 0),
        }
    }

    fn current(&self) -> LessonId {
        LessonId(self.cursor)
    }

    fn next_lesson(&mut self) {
        self.cursor += 1;
        self.home = None;
        self.scan = LessonSlot::new(0, 0);
    }

    fn next_candidate(&mut self, schedule: &Schedule) -> Option<LessonSlot> {
        let term = schedule.term();
        while self.scan.day < term.ndays() {
            if self.scan.slot < term.nslots(self.scan.day) {
                let candidate = self.scan;
                self.scan.slot += 1;
                return Some(candidate);
            }
            self.scan = LessonSlot::new(self.scan.day + 1, 0);
        }
        None
    }

    /// Moves the current lesson to its next feasible slot. A lesson with
    /// no slot left is put back at its last kept slot and the following
    /// lesson is tried. Returns false once every lesson has been visited.
    pub fn improve_to_next(&mut self, schedule: &mut Schedule) -> bool {
        while self.cursor < schedule.lessons().len() {
            let id = self.current();
            let home = *self.home.get_or_insert(schedule.lesson(id).slot());

            while let Some(candidate) = self.next_candidate(schedule) {
                if schedule.move_lesson(id, candidate).is_ok() {
                    return true;
                }
            }

            schedule.restore_lesson(id, home);
            self.next_lesson();
        }
        false
    }

    /// Keeps the last move of the current lesson.
    pub fn submit_changes(&mut self, schedule: &Schedule) {
        if let Some(lesson) = schedule.lessons().get(self.cursor) {
            self.home = Some(lesson.slot());
        }
    }

    /// Undoes the moves of the current lesson since its last kept slot and
    /// goes on with the next lesson.
    pub fn revert(&mut self, schedule: &mut Schedule) {
        if let Some(home) = self.home {
            schedule.restore_lesson(self.current(), home);
        }
        self.next_lesson();
    }

    /// Runs the search against `penalty`. Returns the number of kept moves.
    pub fn run_with_penalty<F>(&mut self, schedule: &mut Schedule, mut penalty: F) -> usize
    where
        F: FnMut(&mut Schedule) -> f64,
    {
        let mut current = penalty(schedule);
        let mut steps = 0;
        let mut kept = 0;

        while current > 1e-9 && self.step_limit.is_none_or(|limit| steps < limit) {
            if !self.improve_to_next(schedule) {
                break;
            }
            steps += 1;

            let candidate = penalty(schedule);
            if candidate <= current {
                debug!("kept move of {}: {current:.2} -> {candidate:.2}", self.current());
                current = candidate;
                kept += 1;
                self.submit_changes(schedule);
            } else {
                self.revert(schedule);
            }
        }

        kept
    }
}

impl GeneratorPhase for Improver {
    fn name(&self) -> &'static str {
        "improver"
    }

    fn run(&mut self, schedule: &mut Schedule, _errors: &mut ErrorReport) {
        let weights = self.weights;
        let before = ScheduleFault::measure(schedule, &weights).penalty();
        let kept = self.run_with_penalty(schedule, |s| ScheduleFault::measure(s, &weights).penalty());
        let after = ScheduleFault::measure(schedule, &weights).penalty();
        info!("improver kept {kept} moves, fault {before:.2} -> {after:.2}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnassignedLesson;
    use crate::testing::InstanceBuilder;

    fn setup(hours: u32, slots: &[usize]) -> Schedule {
        let mut schedule = InstanceBuilder::new(1, 4)
            .teacher("t")
            .group("g", None)
            .lesson_type("lec", vec![])
            .load("t", "d", "lec", &["g"], hours)
            .schedule();
        let draft: UnassignedLesson = schedule.obligations()[0];
        schedule.group_mut(draft.group).bind_weekday(draft.lesson_type, 1).unwrap();
        for &slot in slots {
            schedule
                .assign_lesson_unchecked(&draft, LessonSlot::new(1, slot))
                .unwrap();
        }
        schedule
    }

    fn slots(schedule: &Schedule) -> Vec<usize> {
        schedule.lessons().iter().map(|l| l.slot().slot).collect()
    }

    #[test]
    fn closes_group_windows() {
        let mut schedule = setup(4, &[0, 3]);
        let weights = FaultWeights::default();
        assert!(ScheduleFault::measure(&mut schedule, &weights).total() > 2000.0);

        Improver::new(weights, None).run(&mut schedule, &mut ErrorReport::new());
        assert_eq!(slots(&schedule), vec![2, 3]);
        assert_eq!(schedule.group_windows(), 0);
        assert_eq!(ScheduleFault::measure(&mut schedule, &weights).total(), 0.0);
    }

    #[test]
    fn worse_moves_are_reverted() {
        let mut schedule = setup(6, &[0, 1]);
        let weights = FaultWeights::default();
        let mut improver = Improver::new(weights, None);
        let kept = improver.run_with_penalty(&mut schedule, |s| ScheduleFault::measure(s, &weights).total());

        assert_eq!(kept, 1);
        assert_eq!(slots(&schedule), vec![2, 1]);
        assert_eq!(ScheduleFault::measure(&mut schedule, &weights).total(), 40.0);
    }

    #[test]
    fn step_limit_leaves_lessons_on_kept_slots() {
        let mut schedule = setup(4, &[0, 3]);
        let weights = FaultWeights::default();
        let mut improver = Improver::new(weights, Some(1));
        let kept = improver.run_with_penalty(&mut schedule, |s| ScheduleFault::measure(s, &weights).total());

        assert_eq!(kept, 1);
        assert_eq!(slots(&schedule), vec![1, 3]);
    }

    #[test]
    fn nothing_to_do_on_a_perfect_schedule() {
        let mut schedule = setup(4, &[1, 2]);
        let mut improver = Improver::new(FaultWeights::default(), None);
        let kept = improver.run_with_penalty(&mut schedule, |_| 0.0);
        assert_eq!(kept, 0);
        assert!(!Improver::new(FaultWeights::default(), None).improve_to_next(&mut setup(4, &[])));
    }
}
