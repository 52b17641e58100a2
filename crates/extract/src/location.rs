use crate::rules::{Context, Rule, RuleSet, capture_or_whole};
use once_cell::sync::Lazy;

// Labelled rules return their capture; the trailing keyword rules capture
// nothing and return the matched phrase itself.
pub static LOCATION_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(
        "submission_location",
        vec![
            Rule::new("place_label", r"(?:제출\s*장소|submission\s+location)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("method_label", r"(?:제출\s*방법|submission\s+method)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("recipient_label", r"(?:제출처|submitted\s+to)\s*[:：]\s*([^\r\n]+)", capture_or_whole),
            Rule::new("email_label", r"(?:이메일|e-?mail)\s*[:：]\s*([\w.\-]+@[\w.\-]+)", capture_or_whole),
            Rule::new("lms", r"LMS\s*제출", capture_or_whole),
            Rule::new("offline", r"오프라인\s*제출", capture_or_whole),
            Rule::new("online", r"온라인\s*제출", capture_or_whole),
        ],
    )
});

pub fn extract_location(text: &str, ctx: &Context) -> String {
    LOCATION_RULES.apply(text, ctx)
}
