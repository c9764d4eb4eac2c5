//! The arena holding every entity of one run, plus lesson registration.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use modern_multiset::HashMultiSet;

use crate::binding::BindingError;
use crate::errors::{LessonLabel, PlacementError};
use crate::grid::{Cell, GridError, LessonSlot};
use crate::group::StudentGroup;
use crate::input::{ConfigError, Instance, Term};
use crate::model::{
    Discipline, DisciplineId, GroupId, Lesson, LessonId, LessonType, LessonTypeId, TeacherId,
    UnassignedLesson,
};
use crate::teacher::{Teacher, TeacherLoadKey};

fn index_ids<'a, I>(kind: &'static str, ids: I) -> Result<HashMap<String, usize>, ConfigError>
where
    I: Iterator<Item = &'a str>,
{
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if index.insert(id.to_string(), i).is_some() {
            return Err(ConfigError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(index)
}

fn lookup(index: &HashMap<String, usize>, kind: &'static str, id: &str) -> Result<usize, ConfigError> {
    index.get(id).copied().ok_or_else(|| ConfigError::UnknownId {
        kind,
        id: id.to_string(),
    })
}

fn check_weekday(weekday: usize) -> Result<usize, ConfigError> {
    if weekday > 6 {
        return Err(ConfigError::Weekday(weekday));
    }
    Ok(weekday)
}

/// Every teacher, group, discipline and lesson type of an instance, the
/// obligations derived from the study loads, and the lessons placed so
/// far.
///
/// Entities refer to each other through handles into this arena. Lessons
/// are only ever added or relocated.
#[derive(Debug, Clone)]
pub struct Schedule {
    term: Term,
    teachers: Vec<Teacher>,
    groups: Vec<StudentGroup>,
    disciplines: Vec<Discipline>,
    lesson_types: Vec<LessonType>,
    obligations: Vec<UnassignedLesson>,
    lessons: Vec<Lesson>,
    teacher_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    discipline_index: HashMap<String, usize>,
    lesson_type_index: HashMap<String, usize>,
}

impl Schedule {
    /// Builds the entities of `instance` and registers its study loads.
    /// Any malformed record aborts the whole build.
    pub fn from_instance(instance: &Instance) -> Result<Self, ConfigError> {
        let term = Term::new(&instance.term)?;
        if term.seed_days(instance.generator.seed_week).is_none() {
            return Err(ConfigError::SeedWeek {
                week: instance.generator.seed_week,
                nweeks: term.nweeks(),
            });
        }

        let teacher_index = index_ids("teacher", instance.teachers.iter().map(|r| r.id.as_str()))?;
        let group_index = index_ids(
            "student group",
            instance.student_groups.iter().map(|r| r.id.as_str()),
        )?;
        let discipline_index = index_ids(
            "discipline",
            instance.disciplines.iter().map(|r| r.id.as_str()),
        )?;
        let lesson_type_index = index_ids(
            "lesson type",
            instance.lesson_types.iter().map(|r| r.id.as_str()),
        )?;

        let mut teachers = Vec::with_capacity(instance.teachers.len());
        for (i, record) in instance.teachers.iter().enumerate() {
            let mut grid = term.grid();
            for &weekday in &record.busy_weekdays {
                grid.block_weekday(check_weekday(weekday)?)
                    .map_err(|_| ConfigError::Weekday(weekday))?;
            }
            teachers.push(Teacher::new(
                TeacherId(i),
                record.name.clone(),
                record.priority,
                grid,
            ));
        }

        let mut groups = Vec::with_capacity(instance.student_groups.len());
        for (i, record) in instance.student_groups.iter().enumerate() {
            let mut grid = term.grid();
            if let Some(weekday) = record.military_day {
                grid.block_weekday(check_weekday(weekday)?)
                    .map_err(|_| ConfigError::Weekday(weekday))?;
            }
            let max = record
                .max_lessons_per_day
                .unwrap_or(term.max_student_workload);
            groups.push(StudentGroup::new(GroupId(i), record.name.clone(), max, grid));
        }
        for (i, record) in instance.student_groups.iter().enumerate() {
            for other in &record.connected_groups {
                let j = lookup(&group_index, "student group", other)?;
                groups[i].add_connected_group(GroupId(j));
                groups[j].add_connected_group(GroupId(i));
            }
        }

        let mut disciplines: Vec<Discipline> = instance
            .disciplines
            .iter()
            .map(|r| Discipline::new(r.id.clone(), r.name.clone()))
            .collect();

        let lesson_types: Vec<LessonType> = instance
            .lesson_types
            .iter()
            .map(|r| LessonType {
                id: r.id.clone(),
                name: r.name.clone(),
                hours: r.hours,
                weeks: r.weeks.clone(),
            })
            .collect();

        let mut obligations = Vec::new();
        let mut seen = BTreeSet::new();
        for load in &instance.study_loads {
            let teacher = TeacherId(lookup(&teacher_index, "teacher", &load.teacher_id)?);
            for entry in &load.disciplines {
                let discipline =
                    DisciplineId(lookup(&discipline_index, "discipline", &entry.discipline_id)?);
                let lesson_type =
                    LessonTypeId(lookup(&lesson_type_index, "lesson type", &entry.lesson_type_id)?);
                if entry.hours == 0 {
                    return Err(ConfigError::ZeroHours {
                        teacher: load.teacher_id.clone(),
                        discipline: entry.discipline_id.clone(),
                    });
                }
                let group_ids = entry
                    .group_ids
                    .iter()
                    .map(|id| lookup(&group_index, "student group", id).map(GroupId))
                    .collect::<Result<Vec<_>, _>>()?;

                disciplines[discipline.0].add_load(teacher, lesson_type, group_ids.clone(), entry.hours);

                for group in group_ids {
                    teachers[teacher.0].add_load(
                        TeacherLoadKey {
                            discipline,
                            group,
                            lesson_type,
                        },
                        entry.hours,
                    );

                    let student_group = &mut groups[group.0];
                    if student_group.add_load(lesson_type, entry.hours, teacher) {
                        for &week in &lesson_types[lesson_type.0].weeks {
                            student_group.bind_week(lesson_type, week).map_err(|source| {
                                ConfigError::Binding {
                                    group: instance.student_groups[group.0].id.clone(),
                                    lesson_type: entry.lesson_type_id.clone(),
                                    source,
                                }
                            })?;
                        }
                    }

                    let draft = UnassignedLesson::new(lesson_type, teacher, group, discipline);
                    if seen.insert(draft) {
                        obligations.push(draft);
                    }
                }
            }
        }
        obligations.sort_by_key(|draft: &UnassignedLesson| Reverse(teachers[draft.teacher.0].priority));

        info!(
            "instance {}: {} teachers, {} groups, {} obligations over {} weeks",
            instance.id,
            teachers.len(),
            groups.len(),
            obligations.len(),
            term.nweeks()
        );

        Ok(Self {
            term,
            teachers,
            groups,
            disciplines,
            lesson_types,
            obligations,
            lessons: Vec::new(),
            teacher_index,
            group_index,
            discipline_index,
            lesson_type_index,
        })
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn teacher(&self, id: TeacherId) -> &Teacher {
        &self.teachers[id.0]
    }

    pub fn teacher_id(&self, id: &str) -> Option<TeacherId> {
        self.teacher_index.get(id).copied().map(TeacherId)
    }

    pub fn groups(&self) -> &[StudentGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> &StudentGroup {
        &self.groups[id.0]
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> &mut StudentGroup {
        &mut self.groups[id.0]
    }

    /// Binds `weekday` to `lesson_type` for `group` ahead of generation.
    pub fn bind_weekday(
        &mut self,
        group: GroupId,
        lesson_type: LessonTypeId,
        weekday: usize,
    ) -> Result<(), BindingError> {
        self.groups[group.0].bind_weekday(lesson_type, weekday)
    }

    pub fn group_id(&self, id: &str) -> Option<GroupId> {
        self.group_index.get(id).copied().map(GroupId)
    }

    pub fn disciplines(&self) -> &[Discipline] {
        &self.disciplines
    }

    pub fn discipline(&self, id: DisciplineId) -> &Discipline {
        &self.disciplines[id.0]
    }

    pub fn discipline_id(&self, id: &str) -> Option<DisciplineId> {
        self.discipline_index.get(id).copied().map(DisciplineId)
    }

    pub fn lesson_types(&self) -> &[LessonType] {
        &self.lesson_types
    }

    pub fn lesson_type(&self, id: LessonTypeId) -> &LessonType {
        &self.lesson_types[id.0]
    }

    pub fn lesson_type_id(&self, id: &str) -> Option<LessonTypeId> {
        self.lesson_type_index.get(id).copied().map(LessonTypeId)
    }

    /// Obligations in placement order: descending teacher priority, then
    /// input order.
    pub fn obligations(&self) -> &[UnassignedLesson] {
        &self.obligations
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: LessonId) -> &Lesson {
        &self.lessons[id.0]
    }

    /// Ids of the lessons placed in `week`, in slot order.
    pub fn week_lessons(&self, week: usize) -> Vec<LessonId> {
        let mut ids: Vec<LessonId> = (0..self.lessons.len())
            .map(LessonId)
            .filter(|&id| self.lesson(id).slot().week() == week)
            .collect();
        ids.sort_by_key(|&id| self.lesson(id).slot());
        ids
    }

    pub fn label(&self, draft: &UnassignedLesson) -> LessonLabel {
        let name = |kind: &str, found: Option<&String>| {
            found.cloned().unwrap_or_else(|| format!("<unknown {kind}>"))
        };
        LessonLabel {
            teacher: name("teacher", self.teachers.get(draft.teacher.0).map(|t| &t.name)),
            group: name("group", self.groups.get(draft.group.0).map(|g| &g.name)),
            discipline: name(
                "discipline",
                self.disciplines.get(draft.discipline.0).map(|d| &d.name),
            ),
            lesson_type: name(
                "lesson type",
                self.lesson_types.get(draft.lesson_type.0).map(|t| &t.name),
            ),
        }
    }

    /// Checks that every handle of `draft` points into this schedule.
    pub fn validate(&self, draft: &UnassignedLesson) -> Result<(), PlacementError> {
        if draft.teacher.0 >= self.teachers.len() {
            return Err(PlacementError::UnknownEntity(draft.teacher.to_string()));
        }
        if draft.group.0 >= self.groups.len() {
            return Err(PlacementError::UnknownEntity(draft.group.to_string()));
        }
        if draft.discipline.0 >= self.disciplines.len() {
            return Err(PlacementError::UnknownEntity(draft.discipline.to_string()));
        }
        if draft.lesson_type.0 >= self.lesson_types.len() {
            return Err(PlacementError::UnknownEntity(draft.lesson_type.to_string()));
        }
        Ok(())
    }

    /// Checks whether `draft` can be registered at `slot` for both its
    /// teacher and its group.
    pub fn check_lesson(&self, draft: &UnassignedLesson, slot: LessonSlot) -> Result<(), PlacementError> {
        self.validate(draft)?;
        self.teacher(draft.teacher)
            .check_lesson(&TeacherLoadKey::from(draft), slot)?;
        self.group(draft.group).check_lesson(draft.lesson_type, slot)
    }

    /// Places `draft` at `slot`: occupies the teacher and group grids and
    /// credits the teacher, group and discipline loads.
    pub fn assign_lesson(&mut self, draft: &UnassignedLesson, slot: LessonSlot) -> Result<LessonId, PlacementError> {
        self.check_lesson(draft, slot)?;

        let id = LessonId(self.lessons.len());
        let value = self.term.lesson_value;
        self.teachers[draft.teacher.0].add_lesson(&TeacherLoadKey::from(draft), id, slot, value);
        self.groups[draft.group.0].add_lesson(draft.lesson_type, id, slot, value);
        let credited = self.disciplines[draft.discipline.0].credit(draft, id, value);
        debug_assert!(credited, "no discipline load covers {draft:?}");
        self.lessons.push(Lesson::new(*draft, slot, value));

        debug!("placed {} at {slot}", self.label(draft));
        Ok(id)
    }

    /// Places `draft` at `slot` without any feasibility check, so double
    /// bookings can be reproduced. Only the slot range and blocked cells
    /// are refused.
    pub fn assign_lesson_unchecked(
        &mut self,
        draft: &UnassignedLesson,
        slot: LessonSlot,
    ) -> Result<LessonId, PlacementError> {
        self.validate(draft)?;
        for grid in [self.teacher(draft.teacher).grid(), self.group(draft.group).grid()] {
            if grid.cell(slot).map_err(GridError::from)? == Cell::Blocked {
                return Err(GridError::Blocked(slot).into());
            }
        }

        let id = LessonId(self.lessons.len());
        let value = self.term.lesson_value;
        self.teachers[draft.teacher.0].force_lesson(&TeacherLoadKey::from(draft), id, slot, value);
        self.groups[draft.group.0].force_lesson(draft.lesson_type, id, slot, value);
        self.disciplines[draft.discipline.0].credit(draft, id, value);
        self.lessons.push(Lesson::new(*draft, slot, value));
        Ok(id)
    }

    /// Relocates lesson `id` to `to` if both its teacher and its group
    /// accept the move.
    pub fn move_lesson(&mut self, id: LessonId, to: LessonSlot) -> Result<(), PlacementError> {
        let lesson = *self
            .lessons
            .get(id.0)
            .ok_or_else(|| PlacementError::UnknownEntity(id.to_string()))?;
        let from = lesson.slot();
        self.teacher(lesson.teacher()).lesson_can_be_moved(from, to)?;
        self.group(lesson.group())
            .lesson_can_be_moved(lesson.lesson_type(), from, to)?;

        self.relocate(id, from, to);
        Ok(())
    }

    /// Puts lesson `id` back at `to`, a slot it held before.
    ///
    /// # Panics
    ///
    /// Panics when either grid refuses the move.
    pub(crate) fn restore_lesson(&mut self, id: LessonId, to: LessonSlot) {
        let from = self.lessons[id.0].slot();
        if from != to {
            self.relocate(id, from, to);
        }
    }

    fn relocate(&mut self, id: LessonId, from: LessonSlot, to: LessonSlot) {
        let lesson = self.lessons[id.0];
        if let Err(e) = self.teachers[lesson.teacher().0].move_lesson(from, to) {
            panic!("checked move of {id} failed for its teacher: {e}");
        }
        if let Err(e) = self.groups[lesson.group().0].move_lesson(from, to) {
            panic!("checked move of {id} failed for its group: {e}");
        }
        self.lessons[id.0].relocate(to);
        debug!("moved {id} from {from} to {to}");
    }

    fn slots_where<F>(&self, pred: F) -> Vec<LessonSlot>
    where
        F: Fn(&Lesson) -> bool,
    {
        self.lessons
            .iter()
            .filter(|lesson| pred(lesson))
            .map(Lesson::slot)
            .collect()
    }

    /// Lessons of `teacher` sharing a slot with another of its lessons.
    pub fn teacher_overlaps(&mut self, teacher: TeacherId) -> usize {
        let slots = self.slots_where(|lesson| lesson.teacher() == teacher);
        self.teachers[teacher.0]
            .grid_mut()
            .count_lesson_overlapping(&slots)
    }

    /// Lessons of `group` sharing a slot with another of its lessons.
    pub fn group_overlaps(&mut self, group: GroupId) -> usize {
        let slots = self.slots_where(|lesson| lesson.group() == group);
        self.groups[group.0]
            .grid_mut()
            .count_lesson_overlapping(&slots)
    }

    /// Lessons of `group` beyond its daily cap, over the whole term.
    pub fn group_overtime(&self, group: GroupId) -> usize {
        let days: HashMultiSet<usize> = self
            .lessons
            .iter()
            .filter(|lesson| lesson.group() == group)
            .map(|lesson| lesson.slot().day)
            .collect();
        let max = self.group(group).max_lessons_per_day;
        days.distinct_elements()
            .map(|day| days.count_of(day).saturating_sub(max))
            .sum()
    }

    /// Lessons of `group` placed on a day not typed for their lesson type.
    pub fn group_invalid_type_days(&self, group: GroupId) -> usize {
        let student_group = self.group(group);
        self.lessons
            .iter()
            .filter(|lesson| lesson.group() == group)
            .filter(|lesson| !student_group.is_day_of_type(lesson.lesson_type(), lesson.slot().day))
            .count()
    }

    pub fn teacher_windows(&self) -> usize {
        self.teachers.iter().map(|t| t.grid().count_windows()).sum()
    }

    pub fn group_windows(&self) -> usize {
        self.groups.iter().map(|g| g.grid().count_windows()).sum()
    }

    pub fn teacher_hour_deficit(&self) -> u32 {
        self.teachers.iter().map(Teacher::hour_deficit).sum()
    }

    pub fn group_hour_deficit(&self) -> u32 {
        self.groups.iter().map(StudentGroup::hour_deficit).sum()
    }

    pub fn discipline_hour_deficit(&self) -> u32 {
        self.disciplines.iter().map(Discipline::hour_deficit).sum()
    }

    pub fn total_teacher_overlaps(&mut self) -> usize {
        (0..self.teachers.len())
            .map(|i| self.teacher_overlaps(TeacherId(i)))
            .sum()
    }

    pub fn total_group_overlaps(&mut self) -> usize {
        (0..self.groups.len())
            .map(|i| self.group_overlaps(GroupId(i)))
            .sum()
    }

    pub fn total_group_overtime(&self) -> usize {
        (0..self.groups.len())
            .map(|i| self.group_overtime(GroupId(i)))
            .sum()
    }

    pub fn total_group_invalid_type_days(&self) -> usize {
        (0..self.groups.len())
            .map(|i| self.group_invalid_type_days(GroupId(i)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::generator::GeneratorConfig;
    use crate::input::*;

    fn instance() -> Instance {
        let mut comfort = vec![vec![1.0; 4]; 7];
        comfort[0] = vec![];
        comfort[6] = vec![];
        Instance {
            id: "unit".into(),
            term: TermConfig {
                start: NaiveDate::from_ymd_opt(2025, 1, 19).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                comfort,
                lesson_value: 2,
                max_student_workload: 3,
            },
            teachers: vec![
                TeacherRecord {
                    id: "t1".into(),
                    name: "Ada".into(),
                    priority: 0,
                    busy_weekdays: vec![5],
                },
                TeacherRecord {
                    id: "t2".into(),
                    name: "Grace".into(),
                    priority: 3,
                    busy_weekdays: vec![],
                },
            ],
            student_groups: vec![
                StudentGroupRecord {
                    id: "g1".into(),
                    name: "CS-101".into(),
                    max_lessons_per_day: None,
                    military_day: Some(4),
                    connected_groups: vec!["g2".into()],
                },
                StudentGroupRecord {
                    id: "g2".into(),
                    name: "CS-102".into(),
                    max_lessons_per_day: Some(2),
                    military_day: None,
                    connected_groups: vec![],
                },
            ],
            disciplines: vec![DisciplineRecord {
                id: "d1".into(),
                name: "Algebra".into(),
            }],
            lesson_types: vec![
                LessonTypeRecord {
                    id: "lec".into(),
                    name: "lecture".into(),
                    hours: 2,
                    weeks: vec![],
                },
                LessonTypeRecord {
                    id: "exam".into(),
                    name: "exam".into(),
                    hours: 2,
                    weeks: vec![1],
                },
            ],
            study_loads: vec![
                StudyLoadRecord {
                    teacher_id: "t1".into(),
                    disciplines: vec![DisciplineLoadRecord {
                        discipline_id: "d1".into(),
                        lesson_type_id: "lec".into(),
                        group_ids: vec!["g1".into(), "g2".into()],
                        hours: 4,
                    }],
                },
                StudyLoadRecord {
                    teacher_id: "t2".into(),
                    disciplines: vec![DisciplineLoadRecord {
                        discipline_id: "d1".into(),
                        lesson_type_id: "exam".into(),
                        group_ids: vec!["g1".into()],
                        hours: 2,
                    }],
                },
            ],
            generator: GeneratorConfig::default(),
        }
    }

    #[test]
    fn ingestion_registers_loads() {
        let schedule = Schedule::from_instance(&instance()).unwrap();
        let g1 = schedule.group_id("g1").unwrap();
        let g2 = schedule.group_id("g2").unwrap();

        assert_eq!(schedule.group(g1).max_lessons_per_day, 3);
        assert_eq!(schedule.group(g2).max_lessons_per_day, 2);
        assert!(schedule.group(g2).connected_groups().contains(&g1));
        assert_eq!(schedule.teacher_hour_deficit(), 10);
        assert_eq!(schedule.group_hour_deficit(), 10);
        assert_eq!(schedule.discipline_hour_deficit(), 10);

        // the exam week is bound at ingestion
        let exam = schedule.lesson_type_id("exam").unwrap();
        assert!(schedule.group(g1).is_day_of_type(exam, 8));
        assert!(!schedule.group(g2).is_day_of_type(exam, 8));
    }

    #[test]
    fn obligations_follow_teacher_priority() {
        let schedule = Schedule::from_instance(&instance()).unwrap();
        let teachers: Vec<_> = schedule
            .obligations()
            .iter()
            .map(|o| schedule.teacher(o.teacher).name.as_str())
            .collect();
        assert_eq!(teachers, vec!["Grace", "Ada", "Ada"]);
    }

    #[test]
    fn blocked_weekdays_cover_the_term() {
        let schedule = Schedule::from_instance(&instance()).unwrap();
        let ada = schedule.teacher(schedule.teacher_id("t1").unwrap());
        assert_eq!(ada.grid().count_slots_on_weekday(5), 0);
        assert_eq!(ada.grid().count_slots_on_weekday(4), 8);
        let g1 = schedule.group(schedule.group_id("g1").unwrap());
        assert_eq!(g1.grid().count_slots_on_weekday(4), 0);
    }

    #[test]
    fn unknown_and_duplicate_ids_are_fatal() {
        let mut bad = instance();
        bad.study_loads[0].disciplines[0].group_ids.push("g9".into());
        assert_eq!(
            Schedule::from_instance(&bad).unwrap_err(),
            ConfigError::UnknownId {
                kind: "student group",
                id: "g9".into()
            }
        );

        let mut bad = instance();
        bad.teachers[1].id = "t1".into();
        assert!(matches!(
            Schedule::from_instance(&bad),
            Err(ConfigError::DuplicateId { kind: "teacher", .. })
        ));

        let mut bad = instance();
        bad.lesson_types[1].weeks = vec![7];
        assert!(matches!(
            Schedule::from_instance(&bad),
            Err(ConfigError::Binding { .. })
        ));

        let mut bad = instance();
        bad.student_groups[0].military_day = Some(7);
        assert_eq!(
            Schedule::from_instance(&bad).unwrap_err(),
            ConfigError::Weekday(7)
        );

        let mut bad = instance();
        bad.generator.seed_week = 2;
        assert_eq!(
            Schedule::from_instance(&bad).unwrap_err(),
            ConfigError::SeedWeek { week: 2, nweeks: 2 }
        );
        bad.generator.seed_week = usize::MAX / 4;
        assert!(matches!(
            Schedule::from_instance(&bad),
            Err(ConfigError::SeedWeek { .. })
        ));

        let mut bad = instance();
        bad.study_loads[1].disciplines[0].hours = 0;
        assert!(matches!(
            Schedule::from_instance(&bad),
            Err(ConfigError::ZeroHours { .. })
        ));
    }

    #[test]
    fn assign_and_move() {
        let mut schedule = Schedule::from_instance(&instance()).unwrap();
        let draft = schedule.obligations()[1];
        let g = draft.group;
        schedule.group_mut(g).bind_weekday(draft.lesson_type, 1).unwrap();

        assert!(matches!(
            schedule.assign_lesson(&draft, LessonSlot::new(2, 0)),
            Err(PlacementError::WrongDayType { .. })
        ));
        let id = schedule.assign_lesson(&draft, LessonSlot::new(1, 0)).unwrap();
        assert_eq!(schedule.teacher(draft.teacher).hour_deficit(), 6);
        assert_eq!(schedule.discipline(draft.discipline).hour_deficit(), 8);
        assert_eq!(schedule.week_lessons(0), vec![id]);

        schedule.move_lesson(id, LessonSlot::new(1, 3)).unwrap();
        assert_eq!(schedule.lesson(id).slot(), LessonSlot::new(1, 3));
        assert!(schedule.teacher(draft.teacher).grid().is_free(LessonSlot::new(1, 0)));
        assert!(schedule.move_lesson(id, LessonSlot::new(2, 0)).is_err());

        schedule.restore_lesson(id, LessonSlot::new(1, 0));
        assert!(schedule.group(g).grid().is_lesson_on(LessonSlot::new(1, 0)));
        assert_eq!(schedule.total_group_invalid_type_days(), 0);
    }

    #[test]
    fn unchecked_lessons_expose_overlaps() {
        let mut schedule = Schedule::from_instance(&instance()).unwrap();
        let draft = schedule.obligations()[1];
        let slot = LessonSlot::new(2, 1);
        schedule.assign_lesson_unchecked(&draft, slot).unwrap();
        schedule.assign_lesson_unchecked(&draft, slot).unwrap();

        assert_eq!(schedule.teacher_overlaps(draft.teacher), 1);
        assert_eq!(schedule.group_overlaps(draft.group), 1);
        // weekday 2 is not typed for the lecture yet
        assert_eq!(schedule.group_invalid_type_days(draft.group), 2);
        assert!(schedule.teacher(draft.teacher).grid().is_lesson_on(slot));
        assert!(schedule
            .assign_lesson_unchecked(&draft, LessonSlot::new(40, 0))
            .is_err());
    }

    #[test]
    fn unchecked_lessons_refuse_blocked_cells() {
        let mut schedule = Schedule::from_instance(&instance()).unwrap();
        let draft = schedule.obligations()[1];
        let before = schedule.teacher(draft.teacher).hour_deficit();

        // Ada never works on Fridays, CS-101 has Thursday as military day
        for slot in [LessonSlot::new(5, 0), LessonSlot::new(4, 0)] {
            assert_eq!(
                schedule.assign_lesson_unchecked(&draft, slot),
                Err(PlacementError::Grid(GridError::Blocked(slot)))
            );
        }
        assert!(schedule.lessons().is_empty());
        assert_eq!(schedule.teacher(draft.teacher).hour_deficit(), before);
        assert_eq!(schedule.teacher_overlaps(draft.teacher), 0);
    }
}
