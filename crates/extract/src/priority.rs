use crate::schema::Priority;

pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "중요", "시험", "발표", "프로젝트", "최종",
    "important", "exam", "presentation", "project", "final",
];

pub const LOW_PRIORITY_KEYWORDS: &[&str] = &["선택", "추가", "보너스", "optional", "extra", "bonus"];

/// Keyword heuristic over the lowercased text. High-priority keywords win
/// over low-priority ones.
pub fn classify_priority(text: &str) -> Priority {
    let lowered = text.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(*k));

    if contains_any(HIGH_PRIORITY_KEYWORDS) {
        Priority::High
    } else if contains_any(LOW_PRIORITY_KEYWORDS) {
        Priority::Low
    } else {
        Priority::Medium
    }
}
