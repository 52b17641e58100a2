use crate::rules::{Context, Rule, RuleSet, capture_or_whole};
use once_cell::sync::Lazy;

pub static TITLE_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(
        "title",
        vec![
            Rule::new("assignment_label", r"(?:과제|assignment)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("title_label", r"(?:제목|title)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("assignment_name_label", r"(?:과제명|assignment\s+name)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("report_label", r"(?:레포트|report)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("numbered_assignment", r"(?:과제|assignment)\s*[1-9]\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("bare_assignment", r"(\w+\s*(?:과제|assignment))", capture_or_whole),
            Rule::new("bare_report", r"(\w+\s*(?:레포트|report))", capture_or_whole),
            Rule::new("bare_project", r"(\w+\s*(?:프로젝트|project))", capture_or_whole),
        ],
    )
});

pub fn extract_title(text: &str, ctx: &Context) -> String {
    TITLE_RULES.apply(text, ctx)
}
