use crate::rules::{Context, Rule, RuleSet, group, group_count, pad2};
use once_cell::sync::Lazy;
use regex::Captures;

// "오후 N시" keeps the hour as written; no 12-hour offset is applied.
pub static TIME_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(
        "time",
        vec![
            Rule::new("hour_minute_until", r"(\d{1,2})\s*[:：시]\s*(\d{2})\s*분?까지", to_hh_mm),
            Rule::new("hour_minute", r"(\d{1,2})\s*[:：시]\s*(\d{2})", to_hh_mm),
            Rule::new("afternoon_hour", r"오후\s*(\d{1,2})\s*[:：시]", to_hh_mm),
            Rule::new("morning_hour", r"오전\s*(\d{1,2})\s*[:：시]", to_hh_mm),
            Rule::new("hour_until", r"(\d{1,2})\s*시\s*까지", to_hh_mm),
        ],
    )
});

fn to_hh_mm(caps: &Captures<'_>, _ctx: &Context) -> String {
    if group_count(caps) >= 2 {
        format!("{}:{}", pad2(group(caps, 1)), pad2(group(caps, 2)))
    } else {
        format!("{}:00", pad2(group(caps, 1)))
    }
}

pub fn extract_time(text: &str, ctx: &Context) -> String {
    TIME_RULES.apply(text, ctx)
}
