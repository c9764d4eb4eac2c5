use std::collections::BTreeSet;

use crate::binding::{BindingError, LessonTypeBinder};
use crate::errors::PlacementError;
use crate::grid::{BusyGrid, GridError, LessonSlot};
use crate::model::{GroupId, LessonId, LessonTypeId, TeacherId};

/// A student group: its own occupancy grid, daily lesson cap and
/// weekday/week typing of its lessons.
///
/// Groups are kept compact: once a day holds a lesson, only the slots
/// right next to an existing lesson are offered on that day.
#[derive(Debug, Clone)]
pub struct StudentGroup {
    pub id: GroupId,
    pub name: String,
    pub max_lessons_per_day: usize,
    grid: BusyGrid,
    binder: LessonTypeBinder,
    connected: BTreeSet<GroupId>,
    teachers: BTreeSet<TeacherId>,
}

impl StudentGroup {
    pub fn new(id: GroupId, name: String, max_lessons_per_day: usize, grid: BusyGrid) -> Self {
        let binder = LessonTypeBinder::new(grid.nweeks());
        Self {
            id,
            name,
            max_lessons_per_day,
            grid,
            binder,
            connected: BTreeSet::new(),
            teachers: BTreeSet::new(),
        }
    }

    pub fn grid(&self) -> &BusyGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut BusyGrid {
        &mut self.grid
    }

    pub fn binder(&self) -> &LessonTypeBinder {
        &self.binder
    }

    pub fn connected_groups(&self) -> &BTreeSet<GroupId> {
        &self.connected
    }

    pub fn add_connected_group(&mut self, group: GroupId) {
        if group != self.id {
            self.connected.insert(group);
        }
    }

    pub fn teachers(&self) -> &BTreeSet<TeacherId> {
        &self.teachers
    }

    /// Registers `hours` of `lesson_type` taught by `teacher`. Returns true
    /// when the group had no load of that type before.
    pub fn add_load(&mut self, lesson_type: LessonTypeId, hours: u32, teacher: TeacherId) -> bool {
        self.teachers.insert(teacher);
        self.binder.add_load(lesson_type, hours)
    }

    pub fn bind_weekday(&mut self, lesson_type: LessonTypeId, weekday: usize) -> Result<(), BindingError> {
        self.binder.bind_weekday(lesson_type, weekday)
    }

    pub fn bind_week(&mut self, lesson_type: LessonTypeId, week: usize) -> Result<(), BindingError> {
        self.binder.bind_week(lesson_type, week)
    }

    pub fn is_day_of_type(&self, lesson_type: LessonTypeId, day: usize) -> bool {
        self.binder.is_day_of_type(lesson_type, day)
    }

    pub fn is_busy(&self, slot: LessonSlot) -> bool {
        if self.grid.check_slot(slot).is_err() || !self.grid.is_free(slot) {
            return true;
        }
        let count = self.grid.count_lessons_on(slot.day);
        if count >= self.max_lessons_per_day {
            return true;
        }
        if count == 0 {
            return false;
        }

        let before = slot
            .slot
            .checked_sub(1)
            .is_some_and(|s| self.grid.is_lesson_on(LessonSlot::new(slot.day, s)));
        let after = self.grid.is_lesson_on(LessonSlot::new(slot.day, slot.slot + 1));
        !(before || after)
    }

    /// Comfort weight of each slot of `day` the group can take, 0 for the
    /// others.
    pub fn free_slots(&self, day: usize) -> Vec<f32> {
        let mut weights = self.grid.free_slots(day);
        for (slot, weight) in weights.iter_mut().enumerate() {
            if self.is_busy(LessonSlot::new(day, slot)) {
                *weight = 0.0;
            }
        }
        weights
    }

    /// Free slots of `weekday` over the whole term, at most the daily cap
    /// per day.
    pub fn count_slots_on_weekday(&self, weekday: usize) -> usize {
        if BusyGrid::check_weekday(weekday).is_err() {
            return 0;
        }
        (weekday..self.grid.ndays())
            .step_by(7)
            .map(|day| {
                let free = self.grid.free_slots(day).iter().filter(|&&w| w > 0.0).count();
                free.min(self.max_lessons_per_day)
            })
            .sum()
    }

    /// First day from `start` on that is typed for `lesson_type` and still
    /// below the daily cap.
    pub fn next_day_of_type(&self, lesson_type: LessonTypeId, start: usize) -> Option<usize> {
        (start..self.grid.ndays()).find(|&day| {
            self.is_day_of_type(lesson_type, day)
                && self.grid.count_lessons_on(day) < self.max_lessons_per_day
        })
    }

    pub fn check_lesson(&self, lesson_type: LessonTypeId, slot: LessonSlot) -> Result<(), PlacementError> {
        self.grid.check_slot(slot).map_err(GridError::from)?;
        if self.is_busy(slot) {
            return Err(PlacementError::GroupBusy {
                group: self.id,
                slot,
            });
        }
        if !self.is_day_of_type(lesson_type, slot.day) {
            return Err(PlacementError::WrongDayType {
                group: self.id,
                lesson_type,
                day: slot.day,
            });
        }
        Ok(())
    }

    /// # Panics
    ///
    /// Panics when the group has no load of `lesson_type` or `slot` is not
    /// free.
    pub(crate) fn add_lesson(&mut self, lesson_type: LessonTypeId, lesson: LessonId, slot: LessonSlot, value: u32) {
        let ledger = self
            .binder
            .ledger_mut(lesson_type)
            .unwrap_or_else(|| panic!("{} has no load of {lesson_type}", self.id));
        ledger.add_lesson(lesson, value);
        if let Err(e) = self.grid.set_slot_busy_state(slot, true) {
            panic!("{} rejected a checked slot: {e}", self.id);
        }
    }

    pub(crate) fn force_lesson(&mut self, lesson_type: LessonTypeId, lesson: LessonId, slot: LessonSlot, value: u32) {
        if self.binder.ledger_mut(lesson_type).is_none() {
            self.binder.add_load(lesson_type, 0);
        }
        if let Some(ledger) = self.binder.ledger_mut(lesson_type) {
            ledger.add_lesson(lesson, value);
        }
        let marked = self.grid.set_slot_busy_state(slot, true);
        debug_assert!(marked.is_ok(), "{} forced onto {slot}: {marked:?}", self.id);
    }

    pub fn hour_deficit(&self) -> u32 {
        self.binder.hour_deficit()
    }

    pub fn assigned_lessons(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.binder
            .iter()
            .flat_map(|(_, binding)| binding.ledger().lessons().iter().copied())
    }

    /// Checks a move of a `lesson_type` lesson. The compactness rule is not
    /// applied here; moves are judged by the fault score.
    pub fn lesson_can_be_moved(
        &self,
        lesson_type: LessonTypeId,
        from: LessonSlot,
        to: LessonSlot,
    ) -> Result<(), PlacementError> {
        self.grid.lesson_can_be_moved(from, to).map_err(|e| match e {
            GridError::NotFree(slot) => PlacementError::GroupBusy {
                group: self.id,
                slot,
            },
            e => e.into(),
        })?;
        if !self.is_day_of_type(lesson_type, to.day) {
            return Err(PlacementError::WrongDayType {
                group: self.id,
                lesson_type,
                day: to.day,
            });
        }
        if to.day != from.day && self.grid.count_lessons_on(to.day) >= self.max_lessons_per_day {
            return Err(PlacementError::GroupBusy {
                group: self.id,
                slot: to,
            });
        }
        Ok(())
    }

    pub(crate) fn move_lesson(&mut self, from: LessonSlot, to: LessonSlot) -> Result<(), GridError> {
        self.grid.move_lesson(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LECTURE: LessonTypeId = LessonTypeId(0);

    fn group(max: usize) -> StudentGroup {
        let mut group = StudentGroup::new(
            GroupId(0),
            "CS-101".into(),
            max,
            BusyGrid::new(&vec![vec![1.0; 5]; 14]),
        );
        group.add_load(LECTURE, 8, TeacherId(0));
        group.bind_weekday(LECTURE, 2).unwrap();
        group
    }

    #[test]
    fn empty_day_offers_every_free_slot() {
        let group = group(3);
        assert_eq!(group.free_slots(2), vec![1.0; 5]);
    }

    #[test]
    fn busy_day_offers_adjacent_slots_only() {
        let mut group = group(3);
        group.add_lesson(LECTURE, LessonId(0), LessonSlot::new(2, 2), 2);
        assert_eq!(group.free_slots(2), vec![0.0, 1.0, 0.0, 1.0, 0.0]);

        group.add_lesson(LECTURE, LessonId(1), LessonSlot::new(2, 3), 2);
        assert_eq!(group.free_slots(2), vec![0.0, 1.0, 0.0, 0.0, 1.0]);

        group.add_lesson(LECTURE, LessonId(2), LessonSlot::new(2, 1), 2);
        assert_eq!(group.free_slots(2), vec![0.0; 5]);
        assert!(group.is_busy(LessonSlot::new(2, 0)));
    }

    #[test]
    fn next_day_respects_type_and_cap() {
        let mut group = group(1);
        assert_eq!(group.next_day_of_type(LECTURE, 0), Some(2));
        group.add_lesson(LECTURE, LessonId(0), LessonSlot::new(2, 0), 2);
        assert_eq!(group.next_day_of_type(LECTURE, 0), Some(9));
        assert_eq!(group.next_day_of_type(LECTURE, 10), None);
        assert_eq!(group.next_day_of_type(LessonTypeId(3), 0), None);
    }

    #[test]
    fn check_lesson_rejects_wrong_day_type() {
        let group = group(3);
        group.check_lesson(LECTURE, LessonSlot::new(9, 4)).unwrap();
        assert_eq!(
            group.check_lesson(LECTURE, LessonSlot::new(3, 0)),
            Err(PlacementError::WrongDayType {
                group: GroupId(0),
                lesson_type: LECTURE,
                day: 3
            })
        );
    }

    #[test]
    fn weekday_slots_are_capped_per_day() {
        let group = group(3);
        assert_eq!(group.count_slots_on_weekday(2), 6);
        assert_eq!(group.count_slots_on_weekday(8), 0);
    }

    #[test]
    fn hour_deficit_follows_bindings() {
        let mut group = group(3);
        assert_eq!(group.hour_deficit(), 8);
        group.add_lesson(LECTURE, LessonId(0), LessonSlot::new(2, 0), 2);
        assert_eq!(group.hour_deficit(), 6);
        assert_eq!(group.assigned_lessons().collect::<Vec<_>>(), vec![LessonId(0)]);
    }

    #[test]
    fn moves_check_type_and_cap() {
        let mut group = group(1);
        let from = LessonSlot::new(2, 0);
        group.add_lesson(LECTURE, LessonId(0), from, 2);
        group.add_lesson(LECTURE, LessonId(1), LessonSlot::new(9, 0), 2);

        assert!(matches!(
            group.lesson_can_be_moved(LECTURE, from, LessonSlot::new(3, 0)),
            Err(PlacementError::WrongDayType { .. })
        ));
        assert!(matches!(
            group.lesson_can_be_moved(LECTURE, from, LessonSlot::new(9, 3)),
            Err(PlacementError::GroupBusy { .. })
        ));
        group.lesson_can_be_moved(LECTURE, from, LessonSlot::new(2, 4)).unwrap();
        group.move_lesson(from, LessonSlot::new(2, 4)).unwrap();
        assert!(group.grid().is_lesson_on(LessonSlot::new(2, 4)));
    }

    #[test]
    fn connected_groups_skip_self() {
        let mut group = group(3);
        group.add_connected_group(GroupId(0));
        group.add_connected_group(GroupId(4));
        assert_eq!(group.connected_groups().len(), 1);
    }
}
