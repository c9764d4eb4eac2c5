use crate::model::LessonId;

/// Required against scheduled hours of one load entry, plus the lessons
/// credited to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadLedger {
    required: u32,
    current: u32,
    lessons: Vec<LessonId>,
}

impl LoadLedger {
    pub fn new(required: u32) -> Self {
        Self {
            required,
            ..Self::default()
        }
    }

    pub fn add_required(&mut self, hours: u32) {
        self.required += hours;
    }

    pub fn add_lesson(&mut self, lesson: LessonId, value: u32) {
        self.lessons.push(lesson);
        self.current += value;
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn lessons(&self) -> &[LessonId] {
        &self.lessons
    }

    /// Missing hours, never negative.
    pub fn hour_deficit(&self) -> u32 {
        self.required.saturating_sub(self.current)
    }

    pub fn is_satisfied(&self) -> bool {
        self.hour_deficit() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deficit_is_floored_at_zero() {
        let mut ledger = LoadLedger::new(4);
        assert_eq!(ledger.hour_deficit(), 4);
        assert!(!ledger.is_satisfied());

        ledger.add_lesson(LessonId(0), 2);
        assert_eq!(ledger.hour_deficit(), 2);

        ledger.add_lesson(LessonId(1), 2);
        assert!(ledger.is_satisfied());

        ledger.add_lesson(LessonId(2), 2);
        assert_eq!(ledger.current(), 6);
        assert_eq!(ledger.hour_deficit(), 0);
        assert_eq!(ledger.lessons().len(), 3);
    }

    #[test]
    fn required_hours_accumulate() {
        let mut ledger = LoadLedger::new(2);
        ledger.add_required(3);
        assert_eq!(ledger.required(), 5);
    }
}
