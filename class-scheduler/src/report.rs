//! What a run hands back: placed lessons, per-entity statistics, fault
//! and soft errors.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{ErrorKind, ErrorReport};
use crate::fault::{FaultWeights, ScheduleFault};
use crate::model::{GroupId, TeacherId};
use crate::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonRecord {
    pub teacher: String,
    pub group: String,
    pub discipline: String,
    pub lesson_type: String,
    pub day: usize,
    pub slot: usize,
    pub date: Option<NaiveDate>,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityStats {
    pub name: String,
    pub lessons: usize,
    pub windows: usize,
    pub overlaps: usize,
    pub hour_deficit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overtime: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_type_days: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub instance: String,
    pub lessons: Vec<LessonRecord>,
    pub teachers: Vec<EntityStats>,
    pub groups: Vec<EntityStats>,
    pub fault: ScheduleFault,
    pub errors: Vec<ErrorRecord>,
}

impl ScheduleReport {
    pub fn new(instance: &str, schedule: &mut Schedule, weights: &FaultWeights, errors: &ErrorReport) -> Self {
        let lessons = schedule
            .lessons()
            .iter()
            .map(|lesson| {
                let label = schedule.label(lesson.draft());
                LessonRecord {
                    teacher: label.teacher,
                    group: label.group,
                    discipline: label.discipline,
                    lesson_type: label.lesson_type,
                    day: lesson.slot().day,
                    slot: lesson.slot().slot,
                    date: schedule.term().date_of(lesson.slot().day),
                    value: lesson.value(),
                }
            })
            .collect();

        let teachers = (0..schedule.teachers().len())
            .map(|i| teacher_stats(schedule, TeacherId(i)))
            .collect();
        let groups = (0..schedule.groups().len())
            .map(|i| group_stats(schedule, GroupId(i)))
            .collect();

        Self {
            instance: instance.to_string(),
            lessons,
            teachers,
            groups,
            fault: ScheduleFault::measure(schedule, weights),
            errors: errors
                .iter()
                .map(|e| ErrorRecord {
                    kind: e.kind(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }
}

pub fn teacher_stats(schedule: &mut Schedule, id: TeacherId) -> EntityStats {
    let overlaps = schedule.teacher_overlaps(id);
    let teacher = schedule.teacher(id);
    EntityStats {
        name: teacher.name.clone(),
        lessons: teacher.assigned_lessons().count(),
        windows: teacher.grid().count_windows(),
        overlaps,
        hour_deficit: teacher.hour_deficit(),
        overtime: None,
        invalid_type_days: None,
    }
}

pub fn group_stats(schedule: &mut Schedule, id: GroupId) -> EntityStats {
    let overlaps = schedule.group_overlaps(id);
    let overtime = schedule.group_overtime(id);
    let invalid_type_days = schedule.group_invalid_type_days(id);
    let group = schedule.group(id);
    EntityStats {
        name: group.name.clone(),
        lessons: group.assigned_lessons().count(),
        windows: group.grid().count_windows(),
        overlaps,
        hour_deficit: group.hour_deficit(),
        overtime: Some(overtime),
        invalid_type_days: Some(invalid_type_days),
    }
}
