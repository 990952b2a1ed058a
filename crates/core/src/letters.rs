//! Absence warning letters generated by the Blue Trinity manager.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static UNSAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_RE.replace_all(name, "_").into_owned()
}

/// File name for a letter: `warning_<id>_<name>_<YYYYMMDD>.txt`.
pub fn letter_file_name(employee_id: i64, name: &str, date: NaiveDate) -> String {
    format!(
        "warning_{employee_id}_{}_{}.txt",
        sanitize_filename(name),
        date.format("%Y%m%d")
    )
}

/// Render the warning letter body for an employee marked absent.
///
/// The `Employee ID:` line is included only when an id is known.
pub fn warning_letter(name: &str, employee_id: Option<i64>, date: NaiveDate) -> String {
    let mut lines = vec![
        format!("Date: {}", date.format("%Y-%m-%d")),
        String::new(),
        format!("To: {name}"),
        String::new(),
        "Subject: Warning Notice - Unauthorised Absence".to_string(),
        String::new(),
        format!("Dear {name},"),
        String::new(),
        "This letter is to inform you that our records indicate that you have been \
         marked as 'Absent'. Continued absence without appropriate notification or \
         authorization is a violation of company policy."
            .to_string(),
        String::new(),
        "Please contact your manager immediately and provide any supporting \
         documentation for your absence."
            .to_string(),
        String::new(),
        "Regards,".to_string(),
        "HR Department".to_string(),
    ];
    if let Some(id) = employee_id {
        lines.insert(3, format!("Employee ID: {id}"));
    }
    lines.join("\n")
}
