use std::fmt;

use ndarray::{s, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("day {day} is outside of the grid (0 to {ndays})")]
    Day { day: usize, ndays: usize },
    #[error("slot {slot} of day {day} is outside of the grid (0 to {nslots})")]
    Slot { day: usize, slot: usize, nslots: usize },
    #[error("{0} is not a weekday (0 to 6)")]
    Weekday(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error("slot ({0}) is blocked for reasons other than a lesson")]
    Blocked(LessonSlot),
    #[error("slot ({0}) is not marked as holding a lesson")]
    NoLesson(LessonSlot),
    #[error("slot ({0}) isn't free")]
    NotFree(LessonSlot),
}

/// Position of a lesson within a grid: `day` counts from the grid origin,
/// `slot` is the time slot within that day.
///
/// Ordering is lexicographic by `(day, slot)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LessonSlot {
    pub day: usize,
    pub slot: usize,
}

impl LessonSlot {
    pub fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }

    /// Weekday of the slot, Sunday first.
    pub fn weekday(&self) -> usize {
        self.day % 7
    }

    pub fn week(&self) -> usize {
        self.day / 7
    }

    /// True when `self` lies strictly after `other`.
    pub fn after(&self, other: &LessonSlot) -> bool {
        self > other
    }
}

impl fmt::Display for LessonSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day: {}, slot: {}", self.day, self.slot)
    }
}

/// State of one grid cell. Both `Free` and `Lesson` carry the comfort
/// weight the cell was created with, so occupation can be undone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Free(f32),
    Lesson(f32),
    Blocked,
}

impl Cell {
    fn from_comfort(weight: f32) -> Self {
        if weight > 0.0 {
            Cell::Free(weight)
        } else {
            Cell::Blocked
        }
    }

    pub fn weight(self) -> f32 {
        match self {
            Cell::Free(w) | Cell::Lesson(w) => w,
            Cell::Blocked => 0.0,
        }
    }

    /// Positive when free, negative when holding a lesson, zero when blocked.
    pub fn signed(self) -> f32 {
        match self {
            Cell::Free(w) => w,
            Cell::Lesson(w) => -w,
            Cell::Blocked => 0.0,
        }
    }
}

/// Availability grid of a teacher or student group over the whole term.
///
/// Days may have different slot counts (zero on non-working days). Cells
/// past the end of a day exist in the backing array but are never
/// addressable. Days before `first_day` pad the grid to a whole week and
/// are left out of weekday statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyGrid {
    cells: Array2<Cell>,
    lens: Vec<usize>,
    first_day: usize,
}

impl BusyGrid {
    /// Builds a grid from per-day comfort rows. Weights of 0 become
    /// blocked cells.
    pub fn new<R: AsRef<[f32]>>(rows: &[R]) -> Self {
        let lens: Vec<usize> = rows.iter().map(|r| r.as_ref().len()).collect();
        let width = lens.iter().copied().max().unwrap_or(0);

        let mut cells = Array2::from_elem((rows.len(), width), Cell::Blocked);
        for (day, row) in rows.iter().enumerate() {
            for (slot, &weight) in row.as_ref().iter().enumerate() {
                cells[(day, slot)] = Cell::from_comfort(weight);
            }
        }

        Self {
            cells,
            lens,
            first_day: 0,
        }
    }

    /// Marks the days before `first_day` as padding.
    pub fn starting_at(mut self, first_day: usize) -> Self {
        self.first_day = first_day.min(self.ndays());
        self
    }

    pub fn first_day(&self) -> usize {
        self.first_day
    }

    pub fn ndays(&self) -> usize {
        self.lens.len()
    }

    pub fn nweeks(&self) -> usize {
        self.ndays().div_ceil(7)
    }

    /// Slot count of `day`, 0 outside of the grid.
    pub fn nslots(&self, day: usize) -> usize {
        self.lens.get(day).copied().unwrap_or(0)
    }

    pub fn check_weekday(weekday: usize) -> Result<(), BoundsError> {
        if weekday > 6 {
            return Err(BoundsError::Weekday(weekday));
        }
        Ok(())
    }

    pub fn check_day(&self, day: usize) -> Result<(), BoundsError> {
        if day >= self.ndays() {
            return Err(BoundsError::Day {
                day,
                ndays: self.ndays(),
            });
        }
        Ok(())
    }

    pub fn check_slot(&self, slot: LessonSlot) -> Result<(), BoundsError> {
        self.check_day(slot.day)?;
        let nslots = self.lens[slot.day];
        if slot.slot >= nslots {
            return Err(BoundsError::Slot {
                day: slot.day,
                slot: slot.slot,
                nslots,
            });
        }
        Ok(())
    }

    pub fn cell(&self, slot: LessonSlot) -> Result<Cell, BoundsError> {
        self.check_slot(slot)?;
        Ok(self.cells[(slot.day, slot.slot)])
    }

    fn day_cells(&self, day: usize) -> ArrayView1<'_, Cell> {
        self.cells.slice(s![day, ..self.lens[day]])
    }

    /// False for slots outside of the grid.
    pub fn is_free(&self, slot: LessonSlot) -> bool {
        matches!(self.cell(slot), Ok(Cell::Free(_)))
    }

    /// False for slots outside of the grid.
    pub fn is_lesson_on(&self, slot: LessonSlot) -> bool {
        matches!(self.cell(slot), Ok(Cell::Lesson(_)))
    }

    /// True for slots outside of the grid.
    pub fn is_blocked(&self, slot: LessonSlot) -> bool {
        !matches!(self.cell(slot), Ok(Cell::Free(_) | Cell::Lesson(_)))
    }

    /// Marks a slot as holding a lesson or releases it. Requesting the
    /// state the slot is already in does nothing.
    pub fn set_slot_busy_state(&mut self, slot: LessonSlot, busy: bool) -> Result<(), GridError> {
        self.check_slot(slot)?;
        let cell = &mut self.cells[(slot.day, slot.slot)];
        *cell = match (*cell, busy) {
            (Cell::Blocked, _) => return Err(GridError::Blocked(slot)),
            (Cell::Free(w), true) => Cell::Lesson(w),
            (Cell::Lesson(w), false) => Cell::Free(w),
            (unchanged, _) => unchanged,
        };
        Ok(())
    }

    pub fn block_slot(&mut self, slot: LessonSlot) -> Result<(), BoundsError> {
        self.check_slot(slot)?;
        self.cells[(slot.day, slot.slot)] = Cell::Blocked;
        Ok(())
    }

    pub fn block_full_day(&mut self, day: usize) -> Result<(), BoundsError> {
        self.check_day(day)?;
        self.cells.row_mut(day).fill(Cell::Blocked);
        Ok(())
    }

    /// Blocks `weekday` in every week of the grid.
    pub fn block_weekday(&mut self, weekday: usize) -> Result<(), BoundsError> {
        Self::check_weekday(weekday)?;
        for day in (weekday..self.ndays()).step_by(7) {
            self.cells.row_mut(day).fill(Cell::Blocked);
        }
        Ok(())
    }

    /// Comfort weight of every free slot of `day`, 0 for the others.
    /// Empty outside of the grid.
    pub fn free_slots(&self, day: usize) -> Vec<f32> {
        if self.check_day(day).is_err() {
            return Vec::new();
        }
        self.day_cells(day)
            .iter()
            .map(|cell| match *cell {
                Cell::Free(w) => w,
                _ => 0.0,
            })
            .collect()
    }

    /// Index of the slot of `day` that is free here and in `other` and
    /// maximizes the product of both comfort weights. The first index wins
    /// ties.
    pub fn optimal_free_slot(&self, other: &[f32], day: usize) -> Option<usize> {
        if self.check_day(day).is_err() || self.lens[day] != other.len() {
            return None;
        }

        let mut best = 0.0;
        let mut best_slot = None;
        for (slot, (cell, &theirs)) in self.day_cells(day).iter().zip(other).enumerate() {
            if let Cell::Free(ours) = *cell {
                let value = ours * theirs;
                if best < value {
                    best = value;
                    best_slot = Some(slot);
                }
            }
        }
        best_slot
    }

    pub fn lesson_can_be_moved(&self, from: LessonSlot, to: LessonSlot) -> Result<(), GridError> {
        self.check_slot(from)?;
        if !self.is_lesson_on(from) {
            return Err(GridError::NoLesson(from));
        }
        self.check_slot(to)?;
        if !self.is_free(to) {
            return Err(GridError::NotFree(to));
        }
        Ok(())
    }

    pub fn move_lesson(&mut self, from: LessonSlot, to: LessonSlot) -> Result<(), GridError> {
        self.lesson_can_be_moved(from, to)?;
        self.set_slot_busy_state(to, true)?;
        self.set_slot_busy_state(from, false)
    }

    /// Number of lessons on `day`, 0 outside of the grid.
    pub fn count_lessons_on(&self, day: usize) -> usize {
        if self.check_day(day).is_err() {
            return 0;
        }
        self.day_cells(day)
            .iter()
            .filter(|cell| matches!(cell, Cell::Lesson(_)))
            .count()
    }

    /// Sum of free slots lying strictly between two lessons of the same
    /// day.
    ///
    /// Only lesson cells bound a window. A blocked cell never opens or
    /// closes one; between two lessons it counts toward the gap like a
    /// free slot.
    pub fn count_windows(&self) -> usize {
        let mut count = 0;
        for day in 0..self.ndays() {
            let mut last_lesson: Option<usize> = None;
            for (slot, cell) in self.day_cells(day).iter().enumerate() {
                if let Cell::Lesson(_) = cell {
                    if let Some(last) = last_lesson {
                        count += slot - last - 1;
                    }
                    last_lesson = Some(slot);
                }
            }
        }
        count
    }

    /// Counts lessons of `slots` that share a slot with an earlier one.
    ///
    /// Each listed slot is released as it is visited, so a later duplicate
    /// finds its slot already free. Released slots are occupied again
    /// before returning, leaving the grid as it was.
    pub fn count_lesson_overlapping(&mut self, slots: &[LessonSlot]) -> usize {
        let mut count = 0;
        let mut released = Vec::with_capacity(slots.len());

        for &slot in slots {
            if let Ok(Cell::Lesson(w)) = self.cell(slot) {
                self.cells[(slot.day, slot.slot)] = Cell::Free(w);
                released.push(slot);
            } else {
                count += 1;
            }
        }

        for slot in released {
            if let Cell::Free(w) = self.cells[(slot.day, slot.slot)] {
                self.cells[(slot.day, slot.slot)] = Cell::Lesson(w);
            }
        }

        count
    }

    /// Mean signed cell value of each weekday, averaged per day and then
    /// across every week sharing that weekday. Padding days before
    /// `first_day` are skipped.
    pub fn weekdays_priority(&self) -> [f32; 7] {
        let mut result = [0.0f32; 7];
        for (weekday, priority) in result.iter_mut().enumerate() {
            let days = (weekday..self.ndays())
                .step_by(7)
                .filter(|&day| day >= self.first_day);
            for (week, day) in days.enumerate() {
                let cells = self.day_cells(day);
                let average = if cells.is_empty() {
                    0.0
                } else {
                    cells.iter().map(|c| c.signed()).sum::<f32>() / cells.len() as f32
                };
                *priority = (*priority * week as f32 + average) / (week as f32 + 1.0);
            }
        }
        result
    }

    /// Free slots of `weekday` summed over every week, 0 for an invalid
    /// weekday.
    pub fn count_slots_on_weekday(&self, weekday: usize) -> usize {
        if Self::check_weekday(weekday).is_err() {
            return 0;
        }
        (weekday..self.ndays())
            .step_by(7)
            .map(|day| {
                self.day_cells(day)
                    .iter()
                    .filter(|cell| matches!(cell, Cell::Free(_)))
                    .count()
            })
            .sum()
    }
}
