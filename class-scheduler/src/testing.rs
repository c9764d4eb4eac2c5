//! Instance builder shared by the unit tests.

use chrono::{Days, NaiveDate};

use crate::generator::GeneratorConfig;
use crate::input::*;
use crate::schedule::Schedule;

pub(crate) struct InstanceBuilder {
    instance: Instance,
}

impl InstanceBuilder {
    /// A term of `weeks` whole weeks starting on Sunday 2025-01-19, with
    /// `slots` slots of comfort 1 from Monday to Friday.
    pub(crate) fn new(weeks: u64, slots: usize) -> Self {
        let start = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap();
        let end = start.checked_add_days(Days::new(weeks * 7 - 1)).unwrap();
        let mut comfort = vec![vec![1.0; slots]; 7];
        comfort[0] = vec![];
        comfort[6] = vec![];
        Self {
            instance: Instance {
                id: "test".into(),
                term: TermConfig {
                    start,
                    end,
                    comfort,
                    lesson_value: 2,
                    max_student_workload: 3,
                },
                teachers: vec![],
                student_groups: vec![],
                disciplines: vec![],
                lesson_types: vec![],
                study_loads: vec![],
                generator: GeneratorConfig::default(),
            },
        }
    }

    /// Moves the first day of the term, keeping its end.
    pub(crate) fn starting_on(mut self, start: NaiveDate) -> Self {
        self.instance.term.start = start;
        self
    }

    pub(crate) fn comfort(mut self, weekday: usize, row: Vec<f32>) -> Self {
        self.instance.term.comfort[weekday] = row;
        self
    }

    pub(crate) fn teacher(mut self, id: &str) -> Self {
        self.instance.teachers.push(TeacherRecord {
            id: id.into(),
            name: id.into(),
            priority: 0,
            busy_weekdays: vec![],
        });
        self
    }

    pub(crate) fn group(mut self, id: &str, military_day: Option<usize>) -> Self {
        self.instance.student_groups.push(StudentGroupRecord {
            id: id.into(),
            name: id.into(),
            max_lessons_per_day: None,
            military_day,
            connected_groups: vec![],
        });
        self
    }

    pub(crate) fn lesson_type(mut self, id: &str, weeks: Vec<usize>) -> Self {
        self.instance.lesson_types.push(LessonTypeRecord {
            id: id.into(),
            name: id.into(),
            hours: 2,
            weeks,
        });
        self
    }

    /// Adds a study-load entry, creating the discipline on first use.
    pub(crate) fn load(mut self, teacher: &str, discipline: &str, lesson_type: &str, groups: &[&str], hours: u32) -> Self {
        if !self.instance.disciplines.iter().any(|d| d.id == discipline) {
            self.instance.disciplines.push(DisciplineRecord {
                id: discipline.into(),
                name: discipline.into(),
            });
        }
        self.instance.study_loads.push(StudyLoadRecord {
            teacher_id: teacher.into(),
            disciplines: vec![DisciplineLoadRecord {
                discipline_id: discipline.into(),
                lesson_type_id: lesson_type.into(),
                group_ids: groups.iter().map(|&g| g.into()).collect(),
                hours,
            }],
        });
        self
    }

    pub(crate) fn build(self) -> Instance {
        self.instance
    }

    pub(crate) fn schedule(self) -> Schedule {
        Schedule::from_instance(&self.instance).unwrap()
    }
}
