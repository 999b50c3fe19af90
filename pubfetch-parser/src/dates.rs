//! Date Resolver: pick the canonical publication date from a preference list

use time::{Date, Month};
use tracing::debug;

use crate::common::tree::Element;
use crate::schema::DateCandidate;

/// A fully resolved calendar date plus the candidate kind it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: Date,
    pub kind: &'static str,
}

impl ResolvedDate {
    /// `YYYY/MM/DD`
    pub fn formatted(&self) -> String {
        format!(
            "{:04}/{:02}/{:02}",
            self.date.year(),
            u8::from(self.date.month()),
            self.date.day()
        )
    }

    pub fn year(&self) -> String {
        self.date.year().to_string()
    }
}

/// Walk the candidates in order and return the first complete, valid date
///
/// Candidates missing a month or day, or naming an impossible date, are skipped
/// rather than treated as errors.
pub fn resolve_date(article: &Element, candidates: &[DateCandidate]) -> Option<ResolvedDate> {
    candidates.iter().find_map(|candidate| {
        article
            .find_all(candidate.path)
            .into_iter()
            .find_map(date_from_element)
            .map(|date| ResolvedDate {
                date,
                kind: candidate.kind,
            })
            .or_else(|| {
                debug!(kind = candidate.kind, "Date candidate did not resolve");
                None
            })
    })
}

/// `("YYYY/MM/DD", "YYYY")`, or two empty strings when nothing resolved
pub fn render_date(resolved: Option<&ResolvedDate>) -> (String, String) {
    match resolved {
        Some(date) => (date.formatted(), date.year()),
        None => (String::new(), String::new()),
    }
}

/// Build a date from `Year`/`Month`/`Day` children (case-insensitive)
pub fn date_from_element(element: &Element) -> Option<Date> {
    let part = |name: &str| {
        element
            .child_ignore_case(name)
            .map(Element::flat_text)
            .filter(|s| !s.is_empty())
    };

    let year = part("year")?.parse::<i32>().ok()?;
    let month = parse_month(&part("month")?)?;
    let day = part("day")?.parse::<u8>().ok()?;

    Date::from_calendar_date(year, month, day).ok()
}

/// Numeric (`9`, `09`) or English (`Sep`, `Sept`, `September`) month
pub fn parse_month(value: &str) -> Option<Month> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u8>() {
        return Month::try_from(n).ok();
    }
    if value.eq_ignore_ascii_case("sept") {
        return Some(Month::September);
    }

    (1..=12u8).filter_map(|n| Month::try_from(n).ok()).find(|month| {
        let name = month.to_string();
        value.eq_ignore_ascii_case(&name) || value.eq_ignore_ascii_case(&name[..3])
    })
}

/// Child element texts joined by spaces (`2020 Jan 15`, `1998 Dec-1999 Jan`)
pub fn raw_date_text(element: &Element) -> String {
    element
        .child_elements()
        .map(Element::flat_text)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
