pub mod clock;
pub mod date;
pub mod location;
pub mod points;
pub mod priority;
pub mod rules;
pub mod schema;
pub mod time;
pub mod title;

pub use clock::{Clock, FixedClock, SystemClock};
pub use rules::{Context, Rule, RuleSet};
pub use schema::{ParsedAssignment, Priority};

use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

/// Extract assignment fields from free-form text.
///
/// Each field runs its own rule table over the untouched input. Fields
/// that nothing matches stay empty; this never fails.
pub fn parse_assignment(text: &str, today: NaiveDate) -> ParsedAssignment {
    let ctx = Context {
        current_year: today.year(),
    };

    ParsedAssignment {
        title: title::extract_title(text, &ctx),
        description: text.to_string(),
        date: date::extract_date(text, &ctx),
        time: time::extract_time(text, &ctx),
        priority: priority::classify_priority(text),
        points: points::extract_points(text, &ctx),
        submission_location: location::extract_location(text, &ctx),
    }
}

#[derive(Clone)]
pub struct Extractor {
    clock: Arc<dyn Clock>,
}

impl Extractor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Extract fields using the clock's current year for month/day dates.
    pub fn extract(&self, text: &str) -> ParsedAssignment {
        let parsed = parse_assignment(text, self.clock.today());
        tracing::debug!(
            matched = parsed.matched_fields(),
            priority = %parsed.priority,
            "Extracted assignment fields"
        );
        parsed
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
