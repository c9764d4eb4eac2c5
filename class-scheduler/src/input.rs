//! Plain input records and the term calendar built from them.

use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::BindingError;
use crate::generator::GeneratorConfig;
use crate::grid::BusyGrid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    /// Weekdays (Sunday = 0) the teacher never works.
    #[serde(default)]
    pub busy_weekdays: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentGroupRecord {
    pub id: String,
    pub name: String,
    /// Falls back to the term's `max_student_workload`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lessons_per_day: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub military_day: Option<usize>,
    #[serde(default)]
    pub connected_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonTypeRecord {
    pub id: String,
    pub name: String,
    pub hours: u32,
    /// Weeks reserved for this type alone.
    #[serde(default)]
    pub weeks: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineLoadRecord {
    pub discipline_id: String,
    pub lesson_type_id: String,
    pub group_ids: Vec<String>,
    /// Hours per group.
    pub hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyLoadRecord {
    pub teacher_id: String,
    pub disciplines: Vec<DisciplineLoadRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// One row of slot comfort weights per weekday, Sunday first.
    pub comfort: Vec<Vec<f32>>,
    /// Academic hours credited per placed lesson.
    pub lesson_value: u32,
    pub max_student_workload: usize,
}

/// One scheduling problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub term: TermConfig,
    pub teachers: Vec<TeacherRecord>,
    pub student_groups: Vec<StudentGroupRecord>,
    pub disciplines: Vec<DisciplineRecord>,
    pub lesson_types: Vec<LessonTypeRecord>,
    pub study_loads: Vec<StudyLoadRecord>,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Fatal input problems, found before any entity is mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("the comfort table has {0} rows instead of 7")]
    ComfortRows(usize),
    #[error("comfort weight {value} of weekday {weekday}, slot {slot} is negative or not finite")]
    ComfortWeight { weekday: usize, slot: usize, value: f32 },
    #[error("term starts on {start}, after its end on {end}")]
    TermDates { start: NaiveDate, end: NaiveDate },
    #[error("the term calendar cannot be represented")]
    TermRange,
    #[error("lesson value must be positive")]
    LessonValue,
    #[error("seed week {week} is outside of the term ({nweeks} weeks)")]
    SeedWeek { week: usize, nweeks: usize },
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("unknown {kind} id {id:?}")]
    UnknownId { kind: &'static str, id: String },
    #[error("{0} is not a weekday (0 to 6)")]
    Weekday(usize),
    #[error("study load of {discipline:?} for teacher {teacher:?} has no hours")]
    ZeroHours { teacher: String, discipline: String },
    #[error("lesson type {lesson_type:?} of group {group:?}: {source}")]
    Binding {
        group: String,
        lesson_type: String,
        #[source]
        source: BindingError,
    },
}

/// Calendar of a term. Day 0 of every grid is the Sunday on or before
/// `start`, so day `d` always falls on weekday `d % 7`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    origin: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    template: BusyGrid,
    pub lesson_value: u32,
    pub max_student_workload: usize,
}

impl Term {
    pub fn new(config: &TermConfig) -> Result<Self, ConfigError> {
        if config.comfort.len() != 7 {
            return Err(ConfigError::ComfortRows(config.comfort.len()));
        }
        for (weekday, row) in config.comfort.iter().enumerate() {
            for (slot, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::ComfortWeight { weekday, slot, value });
                }
            }
        }
        if config.start > config.end {
            return Err(ConfigError::TermDates {
                start: config.start,
                end: config.end,
            });
        }
        if config.lesson_value == 0 {
            return Err(ConfigError::LessonValue);
        }

        let lead = config.start.weekday().num_days_from_sunday() as usize;
        let origin = config
            .start
            .checked_sub_days(Days::new(lead as u64))
            .ok_or(ConfigError::TermRange)?;
        let ndays = (config.end - origin).num_days() as usize + 1;

        let rows: Vec<&[f32]> = (0..ndays)
            .map(|day| {
                if day < lead {
                    &[][..]
                } else {
                    config.comfort[day % 7].as_slice()
                }
            })
            .collect();

        Ok(Self {
            origin,
            start: config.start,
            end: config.end,
            template: BusyGrid::new(&rows).starting_at(lead),
            lesson_value: config.lesson_value,
            max_student_workload: config.max_student_workload,
        })
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn ndays(&self) -> usize {
        self.template.ndays()
    }

    pub fn nweeks(&self) -> usize {
        self.template.nweeks()
    }

    /// Grid day of `start`. Earlier days only pad the first week.
    pub fn first_day(&self) -> usize {
        self.template.first_day()
    }

    /// The seven days replicated from seed week `week`: that calendar
    /// week, shifted past the padding when the term starts mid-week and
    /// cut at the end of the term. `None` when `week` lies outside the
    /// term.
    pub fn seed_days(&self, week: usize) -> Option<Range<usize>> {
        if week >= self.nweeks() {
            return None;
        }
        let start = (week * 7).max(self.first_day());
        Some(start..(start + 7).min(self.ndays()))
    }

    /// Slot count of `day`, the same in every grid of the term.
    pub fn nslots(&self, day: usize) -> usize {
        self.template.nslots(day)
    }

    /// Calendar date of grid day `day`.
    pub fn date_of(&self, day: usize) -> Option<NaiveDate> {
        self.origin.checked_add_days(Days::new(day as u64))
    }

    /// A fresh grid covering the whole term.
    pub fn grid(&self) -> BusyGrid {
        self.template.clone()
    }
}
