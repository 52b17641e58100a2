use crate::rules::{Context, Rule, RuleSet, group};
use once_cell::sync::Lazy;
use regex::Captures;

pub const POINTS_UNIT: &str = "점";

pub static POINTS_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(
        "points",
        vec![
            Rule::new("allotment_label", r"배점\s*[:：]\s*(\d+)\s*점", with_unit),
            Rule::new("score_label", r"점수\s*[:：]\s*(\d+)\s*점", with_unit),
            Rule::new("out_of", r"(\d+)\s*점\s*만점", with_unit),
            Rule::new("total", r"총\s*(\d+)\s*점", with_unit),
            Rule::new("english_label", r"\b(?:points?|score)\s*[:：]\s*(\d+)", with_unit),
        ],
    )
});

fn with_unit(caps: &Captures<'_>, _ctx: &Context) -> String {
    format!("{}{}", group(caps, 1), POINTS_UNIT)
}

pub fn extract_points(text: &str, ctx: &Context) -> String {
    POINTS_RULES.apply(text, ctx)
}
