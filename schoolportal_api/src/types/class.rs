use serde::{Deserialize, Serialize};

/// A class the student is enrolled in, with its roll and merit counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub course: String,
    /// Falls back to `course` when the page has no class column.
    pub class_code: String,
    pub teacher: String,
    pub room: String,
    pub lessons: i64,
    pub quick_merits: i64,
    pub rolls_marked: i64,
    pub absences: i64,
}

impl ClassInfo {
    /// Fills blank text fields and zero counters from `other`.
    pub fn fill_from(&mut self, other: &ClassInfo) {
        fn text(slot: &mut String, value: &str) {
            if slot.is_empty() && !value.is_empty() {
                *slot = value.to_string();
            }
        }
        fn count(slot: &mut i64, value: i64) {
            if *slot == 0 {
                *slot = value;
            }
        }
        text(&mut self.course, &other.course);
        text(&mut self.teacher, &other.teacher);
        text(&mut self.room, &other.room);
        count(&mut self.lessons, other.lessons);
        count(&mut self.quick_merits, other.quick_merits);
        count(&mut self.rolls_marked, other.rolls_marked);
        count(&mut self.absences, other.absences);
    }
}
