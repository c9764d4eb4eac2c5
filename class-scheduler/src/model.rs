//! Entity handles and the plain entities that carry no grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::LessonSlot;
use crate::load::LoadLedger;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub(crate) usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

handle!(
    /// Index of a teacher in its schedule.
    TeacherId,
    "teacher"
);
handle!(
    /// Index of a student group in its schedule.
    GroupId,
    "group"
);
handle!(DisciplineId, "discipline");
handle!(LessonTypeId, "lesson type");
handle!(
    /// Index of an assigned lesson. Lessons are never removed, so handles
    /// stay valid for the whole run.
    LessonId,
    "lesson"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonType {
    pub id: String,
    pub name: String,
    /// Academic hours of one occurrence.
    pub hours: u32,
    /// Weeks in which only this type may be scheduled.
    pub weeks: Vec<usize>,
}

/// Share of a discipline taught by one teacher as one lesson type to a
/// set of groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisciplineLoad {
    pub teacher: TeacherId,
    pub lesson_type: LessonTypeId,
    pub groups: Vec<GroupId>,
    pub ledger: LoadLedger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discipline {
    pub id: String,
    pub name: String,
    loads: Vec<DisciplineLoad>,
}

impl Discipline {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            loads: Vec::new(),
        }
    }

    /// Registers a load record requiring `hours` for each of `groups`.
    pub fn add_load(
        &mut self,
        teacher: TeacherId,
        lesson_type: LessonTypeId,
        groups: Vec<GroupId>,
        hours: u32,
    ) {
        let ledger = LoadLedger::new(hours * groups.len() as u32);
        self.loads.push(DisciplineLoad {
            teacher,
            lesson_type,
            groups,
            ledger,
        });
    }

    pub fn loads(&self) -> &[DisciplineLoad] {
        &self.loads
    }

    /// Credits a lesson to the first load record that covers it. Returns
    /// false when no record does.
    pub fn credit(&mut self, draft: &UnassignedLesson, lesson: LessonId, value: u32) -> bool {
        let record = self.loads.iter_mut().find(|load| {
            load.teacher == draft.teacher
                && load.lesson_type == draft.lesson_type
                && load.groups.contains(&draft.group)
        });
        match record {
            Some(load) => {
                load.ledger.add_lesson(lesson, value);
                true
            }
            None => false,
        }
    }

    pub fn hour_deficit(&self) -> u32 {
        self.loads.iter().map(|load| load.ledger.hour_deficit()).sum()
    }

    pub fn has_enough_hours(&self) -> bool {
        self.hour_deficit() == 0
    }
}

/// A teaching obligation that has not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnassignedLesson {
    pub lesson_type: LessonTypeId,
    pub teacher: TeacherId,
    pub group: GroupId,
    pub discipline: DisciplineId,
}

impl UnassignedLesson {
    pub fn new(
        lesson_type: LessonTypeId,
        teacher: TeacherId,
        group: GroupId,
        discipline: DisciplineId,
    ) -> Self {
        Self {
            lesson_type,
            teacher,
            group,
            discipline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    draft: UnassignedLesson,
    slot: LessonSlot,
    value: u32,
}

impl Lesson {
    pub fn new(draft: UnassignedLesson, slot: LessonSlot, value: u32) -> Self {
        Self { draft, slot, value }
    }

    pub fn draft(&self) -> &UnassignedLesson {
        &self.draft
    }

    pub fn slot(&self) -> LessonSlot {
        self.slot
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn teacher(&self) -> TeacherId {
        self.draft.teacher
    }

    pub fn group(&self) -> GroupId {
        self.draft.group
    }

    pub fn discipline(&self) -> DisciplineId {
        self.draft.discipline
    }

    pub fn lesson_type(&self) -> LessonTypeId {
        self.draft.lesson_type
    }

    /// True when `self` is positioned after `other`; false for equal slots.
    pub fn after(&self, other: &Lesson) -> bool {
        self.slot.after(&other.slot)
    }

    pub(crate) fn relocate(&mut self, to: LessonSlot) {
        self.slot = to;
    }
}
