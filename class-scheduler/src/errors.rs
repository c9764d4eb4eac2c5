//! Placement rejections and the soft-error report of a generation run.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::grid::{BoundsError, GridError, LessonSlot};
use crate::model::{GroupId, LessonTypeId, TeacherId};

/// Why a lesson could not be registered at a slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("{0} does not exist")]
    UnknownEntity(String),
    #[error("{teacher} is busy at {slot}")]
    TeacherBusy { teacher: TeacherId, slot: LessonSlot },
    #[error("{teacher} already has enough lessons for this load")]
    TeacherSatisfied { teacher: TeacherId },
    #[error("{teacher} has no such load")]
    UnknownLoad { teacher: TeacherId },
    #[error("{group} is busy at {slot}")]
    GroupBusy { group: GroupId, slot: LessonSlot },
    #[error("day {day} of {group} is not a {lesson_type} day")]
    WrongDayType {
        group: GroupId,
        lesson_type: LessonTypeId,
        day: usize,
    },
}

impl PlacementError {
    /// True when the slot lies past the last day of the term.
    pub fn is_out_of_grid(&self) -> bool {
        matches!(self, PlacementError::Grid(GridError::Bounds(BoundsError::Day { .. })))
    }
}

/// Human-readable names of the four parts of an obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonLabel {
    pub teacher: String,
    pub group: String,
    pub discipline: String,
    pub lesson_type: String,
}

impl fmt::Display for LessonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} ({})",
            self.teacher, self.group, self.discipline, self.lesson_type
        )
    }
}

/// A problem met during generation that does not stop the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("no free weekday left for lesson type {lesson_type} of group {group}, which has {free_days} free weekdays")]
    WeekdayAssignment {
        group: String,
        lesson_type: String,
        free_days: usize,
    },
    #[error("no day for {label} in the seed week")]
    SeedWeek { label: LessonLabel },
    #[error("{label} is missing {missing} hours")]
    HourDeficit { label: LessonLabel, missing: u32 },
    #[error("{component}: {operation} failed for {label} at {slot}: {description}")]
    Unexpected {
        component: &'static str,
        operation: &'static str,
        description: String,
        label: LessonLabel,
        slot: LessonSlot,
        #[source]
        source: PlacementError,
    },
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::WeekdayAssignment { .. } => ErrorKind::WeekdayAssignment,
            GenerationError::SeedWeek { .. } => ErrorKind::SeedWeek,
            GenerationError::HourDeficit { .. } => ErrorKind::HourDeficit,
            GenerationError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    WeekdayAssignment,
    SeedWeek,
    HourDeficit,
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::WeekdayAssignment => "weekday assignment",
            ErrorKind::SeedWeek => "seed week",
            ErrorKind::HourDeficit => "hour deficit",
            ErrorKind::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

/// Soft errors of one run, grouped by kind.
///
/// A report that is not clear is itself an error, so the pipeline can
/// return it while the partial schedule stays available for inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorReport {
    errors: BTreeMap<ErrorKind, Vec<GenerationError>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: GenerationError) {
        warn!("{error}");
        self.errors.entry(error.kind()).or_default().push(error);
    }

    pub fn is_clear(&self) -> bool {
        self.errors.values().all(Vec::is_empty)
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.get(&kind).map_or(0, Vec::len)
    }

    pub fn errors_of(&self, kind: ErrorKind) -> &[GenerationError] {
        self.errors.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationError> + '_ {
        self.errors.values().flatten()
    }

    pub fn into_result(self) -> Result<(), ErrorReport> {
        if self.is_clear() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} generation errors", self.len())?;
        for (kind, errors) in &self.errors {
            if !errors.is_empty() {
                write!(f, "\n  {kind}: {}", errors.len())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}
