use crate::rules::{Context, Rule, RuleSet, group, group_count, pad2};
use once_cell::sync::Lazy;
use regex::Captures;

pub static DATE_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(
        "date",
        vec![
            Rule::new(
                "deadline_label",
                r"(?:마감일?|deadline)\s*[:：]\s*(\d{4})[.\-/년]\s*(\d{1,2})[.\-/월]\s*(\d{1,2})일?",
                to_iso_date,
            ),
            Rule::new(
                "submission_date_label",
                r"(?:제출일?|submission\s+date)\s*[:：]\s*(\d{4})[.\-/년]\s*(\d{1,2})[.\-/월]\s*(\d{1,2})일?",
                to_iso_date,
            ),
            Rule::new(
                "due_label",
                r"due\s*[:：]?\s*(\d{4})[.\-/]\s*(\d{1,2})[.\-/]\s*(\d{1,2})",
                to_iso_date,
            ),
            Rule::new(
                "full_date_until",
                r"(\d{4})[.\-/]\s*(\d{1,2})[.\-/]\s*(\d{1,2})\s*까지",
                to_iso_date,
            ),
            Rule::new(
                "month_day_until",
                r"(\d{1,2})[.\-/월]\s*(\d{1,2})일\s*까지",
                to_iso_date,
            ),
            Rule::new("month_day", r"(\d{1,2})월\s*(\d{1,2})일", to_iso_date),
        ],
    )
});

/// `YYYY-MM-DD` from either (year, month, day) or (month, day) captures.
/// The parts are padded, never parsed, so impossible dates pass through.
fn to_iso_date(caps: &Captures<'_>, ctx: &Context) -> String {
    if group_count(caps) >= 3 {
        format!(
            "{}-{}-{}",
            group(caps, 1),
            pad2(group(caps, 2)),
            pad2(group(caps, 3))
        )
    } else {
        format!(
            "{}-{}-{}",
            ctx.current_year,
            pad2(group(caps, 1)),
            pad2(group(caps, 2))
        )
    }
}

pub fn extract_date(text: &str, ctx: &Context) -> String {
    DATE_RULES.apply(text, ctx)
}
