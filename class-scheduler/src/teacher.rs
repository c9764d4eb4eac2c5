use std::collections::BTreeMap;

use crate::errors::PlacementError;
use crate::grid::{BusyGrid, GridError, LessonSlot};
use crate::load::LoadLedger;
use crate::model::{DisciplineId, GroupId, LessonId, LessonTypeId, TeacherId, UnassignedLesson};

/// Key of one teacher obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeacherLoadKey {
    pub discipline: DisciplineId,
    pub group: GroupId,
    pub lesson_type: LessonTypeId,
}

impl From<&UnassignedLesson> for TeacherLoadKey {
    fn from(draft: &UnassignedLesson) -> Self {
        Self {
            discipline: draft.discipline,
            group: draft.group,
            lesson_type: draft.lesson_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    /// Obligations of higher-priority teachers are placed first.
    pub priority: i32,
    grid: BusyGrid,
    loads: BTreeMap<TeacherLoadKey, LoadLedger>,
}

impl Teacher {
    pub fn new(id: TeacherId, name: String, priority: i32, grid: BusyGrid) -> Self {
        Self {
            id,
            name,
            priority,
            grid,
            loads: BTreeMap::new(),
        }
    }

    pub fn grid(&self) -> &BusyGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut BusyGrid {
        &mut self.grid
    }

    pub fn loads(&self) -> impl Iterator<Item = (&TeacherLoadKey, &LoadLedger)> + '_ {
        self.loads.iter()
    }

    pub fn load(&self, key: &TeacherLoadKey) -> Option<&LoadLedger> {
        self.loads.get(key)
    }

    /// Registers `hours` more of an obligation. Repeated keys add up.
    pub fn add_load(&mut self, key: TeacherLoadKey, hours: u32) {
        self.loads.entry(key).or_default().add_required(hours);
    }

    /// Checks whether a lesson of obligation `key` fits in `slot`.
    pub fn check_lesson(&self, key: &TeacherLoadKey, slot: LessonSlot) -> Result<(), PlacementError> {
        self.grid.check_slot(slot).map_err(GridError::from)?;
        if !self.grid.is_free(slot) {
            return Err(PlacementError::TeacherBusy {
                teacher: self.id,
                slot,
            });
        }
        match self.loads.get(key) {
            None => Err(PlacementError::UnknownLoad { teacher: self.id }),
            Some(ledger) if ledger.is_satisfied() => {
                Err(PlacementError::TeacherSatisfied { teacher: self.id })
            }
            Some(_) => Ok(()),
        }
    }

    /// Occupies `slot` and credits the obligation. The caller must have
    /// run [`Teacher::check_lesson`] first.
    ///
    /// # Panics
    ///
    /// Panics when `key` was never registered or `slot` is not free.
    pub(crate) fn add_lesson(&mut self, key: &TeacherLoadKey, lesson: LessonId, slot: LessonSlot, value: u32) {
        let ledger = self
            .loads
            .get_mut(key)
            .unwrap_or_else(|| panic!("{} has no load for {key:?}", self.id));
        ledger.add_lesson(lesson, value);
        if let Err(e) = self.grid.set_slot_busy_state(slot, true) {
            panic!("{} rejected a checked slot: {e}", self.id);
        }
    }

    /// Credits a lesson without touching the grid beyond marking the slot.
    /// Used to reproduce double bookings.
    pub(crate) fn force_lesson(&mut self, key: &TeacherLoadKey, lesson: LessonId, slot: LessonSlot, value: u32) {
        self.loads.entry(*key).or_default().add_lesson(lesson, value);
        let marked = self.grid.set_slot_busy_state(slot, true);
        debug_assert!(marked.is_ok(), "{} forced onto {slot}: {marked:?}", self.id);
    }

    pub fn is_enough_lessons_for(&self, key: &TeacherLoadKey) -> bool {
        self.loads.get(key).is_some_and(LoadLedger::is_satisfied)
    }

    pub fn hour_deficit(&self) -> u32 {
        self.loads.values().map(LoadLedger::hour_deficit).sum()
    }

    pub fn assigned_lessons(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.loads.values().flat_map(|ledger| ledger.lessons().iter().copied())
    }

    pub fn lesson_can_be_moved(&self, from: LessonSlot, to: LessonSlot) -> Result<(), PlacementError> {
        self.grid.lesson_can_be_moved(from, to).map_err(|e| match e {
            GridError::NotFree(slot) => PlacementError::TeacherBusy {
                teacher: self.id,
                slot,
            },
            e => e.into(),
        })
    }

    pub(crate) fn move_lesson(&mut self, from: LessonSlot, to: LessonSlot) -> Result<(), GridError> {
        self.grid.move_lesson(from, to)
    }
}
