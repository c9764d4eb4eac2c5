//! Weekly class timetable generation for a university term.
//!
//! A [`Schedule`] is built from a plain [`Instance`] and then filled by a
//! [`Generator`] in four greedy phases: weekday typing of lesson types
//! ([`DayBlocker`]), a seed week with one lesson per obligation
//! ([`BoneGenerator`]), replication of that week over the term
//! ([`Replicator`]) and gap filling ([`MissingLessonsAdder`]). An optional
//! local search ([`Improver`]) may follow. The result is judged by a
//! [`ScheduleFault`]; problems that do not stop the run land in an
//! [`ErrorReport`].

pub mod binding;
pub mod errors;
pub mod fault;
pub mod generator;
pub mod grid;
pub mod group;
pub mod input;
pub mod load;
pub mod model;
pub mod phases;
pub mod report;
pub mod schedule;
pub mod teacher;

#[cfg(test)]
mod testing;

pub use binding::{BindingError, LessonTypeBinder};
pub use errors::{ErrorKind, ErrorReport, GenerationError, LessonLabel, PlacementError};
pub use fault::{FaultWeights, ScheduleFault};
pub use generator::{Generator, GeneratorConfig};
pub use grid::{BoundsError, BusyGrid, Cell, GridError, LessonSlot};
pub use group::StudentGroup;
pub use input::{ConfigError, Instance, Term};
pub use model::{DisciplineId, GroupId, Lesson, LessonId, LessonTypeId, TeacherId, UnassignedLesson};
pub use phases::{BoneGenerator, DayBlocker, GeneratorPhase, Improver, MissingLessonsAdder, Replicator};
pub use report::ScheduleReport;
pub use schedule::Schedule;
pub use teacher::{Teacher, TeacherLoadKey};

/// Anything that can be scored, lower being better.
pub trait Penalty {
    fn penalty(&self) -> f64;
}
