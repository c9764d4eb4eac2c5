//! Weekday and week bindings of lesson types for one student group.
//!
//! A lesson type is scheduled on the weekdays bound to it. A week bound
//! to a type belongs to that type alone: no other type may use any of its
//! days, whatever their weekday binding says.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::grid::{BoundsError, BusyGrid};
use crate::load::LoadLedger;
use crate::model::LessonTypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error("week {week} is outside of the term (0 to {nweeks})")]
    Week { week: usize, nweeks: usize },
    #[error("{0} has no load for this group")]
    UnknownType(LessonTypeId),
    #[error("weekday {weekday} is already bound to {owner}")]
    WeekdayTaken { weekday: usize, owner: LessonTypeId },
    #[error("week {week} is already bound to {owner}")]
    WeekTaken { week: usize, owner: LessonTypeId },
}

/// Calendar binding and hour ledger of one lesson type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeBinding {
    weekdays: BTreeSet<usize>,
    weeks: BTreeSet<usize>,
    ledger: LoadLedger,
}

impl TypeBinding {
    pub fn weekdays(&self) -> &BTreeSet<usize> {
        &self.weekdays
    }

    pub fn weeks(&self) -> &BTreeSet<usize> {
        &self.weeks
    }

    pub fn ledger(&self) -> &LoadLedger {
        &self.ledger
    }
}

/// Bindings are kept in lesson-type order so that every pass over them is
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonTypeBinder {
    nweeks: usize,
    bindings: BTreeMap<LessonTypeId, TypeBinding>,
}

impl LessonTypeBinder {
    pub fn new(nweeks: usize) -> Self {
        Self {
            nweeks,
            bindings: BTreeMap::new(),
        }
    }

    /// Adds `hours` to the required hours of `lesson_type`. Returns true
    /// when the type had no load before.
    pub fn add_load(&mut self, lesson_type: LessonTypeId, hours: u32) -> bool {
        let created = !self.bindings.contains_key(&lesson_type);
        self.bindings
            .entry(lesson_type)
            .or_default()
            .ledger
            .add_required(hours);
        created
    }

    pub fn lesson_types(&self) -> impl Iterator<Item = LessonTypeId> + '_ {
        self.bindings.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LessonTypeId, &TypeBinding)> + '_ {
        self.bindings.iter().map(|(&lt, binding)| (lt, binding))
    }

    pub fn binding(&self, lesson_type: LessonTypeId) -> Option<&TypeBinding> {
        self.bindings.get(&lesson_type)
    }

    pub(crate) fn ledger_mut(&mut self, lesson_type: LessonTypeId) -> Option<&mut LoadLedger> {
        self.bindings.get_mut(&lesson_type).map(|b| &mut b.ledger)
    }

    pub fn required_hours(&self, lesson_type: LessonTypeId) -> u32 {
        self.binding(lesson_type)
            .map_or(0, |binding| binding.ledger.required())
    }

    pub fn hour_deficit(&self) -> u32 {
        self.bindings.values().map(|b| b.ledger.hour_deficit()).sum()
    }

    pub fn weekday_owner(&self, weekday: usize) -> Option<LessonTypeId> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.weekdays.contains(&weekday))
            .map(|(&lt, _)| lt)
    }

    pub fn week_owner(&self, week: usize) -> Option<LessonTypeId> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.weeks.contains(&week))
            .map(|(&lt, _)| lt)
    }

    /// Fails when the weekday is already bound to any type.
    pub fn bind_weekday(
        &mut self,
        lesson_type: LessonTypeId,
        weekday: usize,
    ) -> Result<(), BindingError> {
        BusyGrid::check_weekday(weekday)?;
        if !self.bindings.contains_key(&lesson_type) {
            return Err(BindingError::UnknownType(lesson_type));
        }
        if let Some(owner) = self.weekday_owner(weekday) {
            return Err(BindingError::WeekdayTaken { weekday, owner });
        }

        if let Some(binding) = self.bindings.get_mut(&lesson_type) {
            binding.weekdays.insert(weekday);
        }
        Ok(())
    }

    /// Fails when the week is already bound to any type.
    pub fn bind_week(&mut self, lesson_type: LessonTypeId, week: usize) -> Result<(), BindingError> {
        if week >= self.nweeks {
            return Err(BindingError::Week {
                week,
                nweeks: self.nweeks,
            });
        }
        if !self.bindings.contains_key(&lesson_type) {
            return Err(BindingError::UnknownType(lesson_type));
        }
        if let Some(owner) = self.week_owner(week) {
            return Err(BindingError::WeekTaken { week, owner });
        }

        if let Some(binding) = self.bindings.get_mut(&lesson_type) {
            binding.weeks.insert(week);
        }
        Ok(())
    }

    pub fn is_day_of_type(&self, lesson_type: LessonTypeId, day: usize) -> bool {
        let week = day / 7;
        if let Some(owner) = self.week_owner(week) {
            if owner != lesson_type {
                return false;
            }
        }

        self.binding(lesson_type).is_some_and(|binding| {
            binding.weekdays.contains(&(day % 7)) || binding.weeks.contains(&week)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LECTURE: LessonTypeId = LessonTypeId(0);
    const PRACTICE: LessonTypeId = LessonTypeId(1);
    const EXAM: LessonTypeId = LessonTypeId(2);

    fn binder() -> LessonTypeBinder {
        let mut binder = LessonTypeBinder::new(4);
        binder.add_load(LECTURE, 8);
        binder.add_load(PRACTICE, 4);
        binder.add_load(EXAM, 2);
        binder
    }

    #[test]
    fn weekday_binding() {
        let mut binder = binder();
        binder.bind_weekday(LECTURE, 1).unwrap();
        assert!(binder.is_day_of_type(LECTURE, 1));
        assert!(binder.is_day_of_type(LECTURE, 15));
        assert!(!binder.is_day_of_type(LECTURE, 2));
        assert!(!binder.is_day_of_type(PRACTICE, 1));
    }

    #[test]
    fn weekday_cannot_be_bound_twice() {
        let mut binder = binder();
        binder.bind_weekday(LECTURE, 1).unwrap();
        assert_eq!(
            binder.bind_weekday(PRACTICE, 1),
            Err(BindingError::WeekdayTaken {
                weekday: 1,
                owner: LECTURE
            })
        );
        assert!(binder.bind_weekday(LECTURE, 1).is_err());
        assert_eq!(
            binder.bind_weekday(LECTURE, 7),
            Err(BindingError::Bounds(BoundsError::Weekday(7)))
        );
        assert_eq!(
            binder.bind_weekday(LessonTypeId(9), 3),
            Err(BindingError::UnknownType(LessonTypeId(9)))
        );
    }

    #[test]
    fn week_binding_takes_precedence() {
        let mut binder = binder();
        binder.bind_weekday(LECTURE, 1).unwrap();
        binder.bind_weekday(PRACTICE, 2).unwrap();
        binder.bind_week(EXAM, 2).unwrap();

        for day in 14..21 {
            assert!(binder.is_day_of_type(EXAM, day));
            assert!(!binder.is_day_of_type(LECTURE, day));
            assert!(!binder.is_day_of_type(PRACTICE, day));
        }
        assert!(binder.is_day_of_type(LECTURE, 8));
        assert!(!binder.is_day_of_type(EXAM, 8));
    }

    #[test]
    fn no_day_belongs_to_two_types_under_a_week_binding() {
        let mut binder = binder();
        binder.bind_weekday(LECTURE, 3).unwrap();
        binder.bind_week(EXAM, 0).unwrap();
        binder.bind_week(PRACTICE, 1).unwrap();
        for day in 0..28 {
            let owners = [LECTURE, PRACTICE, EXAM]
                .into_iter()
                .filter(|&lt| binder.is_day_of_type(lt, day))
                .count();
            assert!(owners <= 1, "day {day} has {owners} types");
        }
    }

    #[test]
    fn week_bounds_and_conflicts() {
        let mut binder = binder();
        binder.bind_week(EXAM, 3).unwrap();
        assert_eq!(
            binder.bind_week(LECTURE, 3),
            Err(BindingError::WeekTaken {
                week: 3,
                owner: EXAM
            })
        );
        assert_eq!(
            binder.bind_week(EXAM, 4),
            Err(BindingError::Week { week: 4, nweeks: 4 })
        );
    }

    #[test]
    fn loads_accumulate_per_type() {
        let mut binder = binder();
        assert!(!binder.add_load(LECTURE, 2));
        assert!(binder.add_load(LessonTypeId(5), 2));
        assert_eq!(binder.required_hours(LECTURE), 10);
        assert_eq!(binder.required_hours(LessonTypeId(7)), 0);
        assert_eq!(binder.hour_deficit(), 18);
        assert_eq!(
            binder.lesson_types().collect::<Vec<_>>(),
            vec![LECTURE, PRACTICE, EXAM, LessonTypeId(5)]
        );
    }
}
