//! Attendance classification and the workforce health summary reported by
//! the Blue Trinity manager.

use serde::Serialize;

use crate::types::Timestamp;

/// How the manager counts an employee status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceClass {
    Active,
    Absent,
}

/// Classify a free-form status value.
///
/// `active`/`a` map to [`AttendanceClass::Active`], `absent` to
/// [`AttendanceClass::Absent`] (case-insensitive, trimmed). Anything else,
/// including an empty value, counts as active.
pub fn classify_status(raw: Option<&str>) -> AttendanceClass {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("absent") => AttendanceClass::Absent,
        _ => AttendanceClass::Active,
    }
}

/// Aggregated workforce figures from one manager pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthSummary {
    pub active: usize,
    pub absent: usize,
    /// Employees with a presence mark for the current UTC day.
    pub present_today: usize,
    pub reports_generated: usize,
    pub last_update: Option<Timestamp>,
}

impl HealthSummary {
    /// Count one employee.
    pub fn record(&mut self, class: AttendanceClass, present_today: bool) {
        match class {
            AttendanceClass::Active => self.active += 1,
            AttendanceClass::Absent => self.absent += 1,
        }
        if present_today {
            self.present_today += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_values() {
        assert_eq!(classify_status(Some("Active")), AttendanceClass::Active);
        assert_eq!(classify_status(Some(" a ")), AttendanceClass::Active);
        assert_eq!(classify_status(Some("ABSENT")), AttendanceClass::Absent);
    }

    #[test]
    fn unknown_values_default_to_active() {
        assert_eq!(classify_status(Some("On Leave")), AttendanceClass::Active);
        assert_eq!(classify_status(Some("")), AttendanceClass::Active);
        assert_eq!(classify_status(None), AttendanceClass::Active);
    }

    #[test]
    fn presence_counted_independently_of_status() {
        let mut summary = HealthSummary::default();
        summary.record(AttendanceClass::Active, false);
        summary.record(AttendanceClass::Absent, true);
        summary.record(AttendanceClass::Active, true);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.present_today, 2);
    }
}
