//! The generation pipeline, one phase per module, run in this order.

mod bone;
mod day_blocker;
mod gap_filler;
mod improver;
mod replicator;

pub use bone::BoneGenerator;
pub use day_blocker::DayBlocker;
pub use gap_filler::MissingLessonsAdder;
pub use improver::Improver;
pub use replicator::Replicator;

use crate::errors::ErrorReport;
use crate::schedule::Schedule;

/// One pass over a schedule. Phases mutate the schedule in place and
/// record soft errors instead of failing.
pub trait GeneratorPhase {
    fn name(&self) -> &'static str;

    fn run(&mut self, schedule: &mut Schedule, errors: &mut ErrorReport);
}
