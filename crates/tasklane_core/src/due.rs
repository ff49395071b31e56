use serde::Serialize;
use std::cmp::Ordering;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A task's due time as entered, plus the instant it resolves to.
///
/// Values that do not parse are kept verbatim: they are shown as typed, are never
/// due, and order after every parseable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Due {
    raw: String,
    #[serde(with = "time::serde::rfc3339::option")]
    at: Option<OffsetDateTime>,
}

impl Due {
    /// Parses `raw` using `offset` for values that carry no offset of their own.
    pub fn parse(raw: &str, offset: UtcOffset) -> Self {
        let trimmed = raw.trim();
        Self {
            raw: trimmed.to_string(),
            at: parse_instant(trimmed, offset),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn at(&self) -> Option<OffsetDateTime> {
        self.at
    }

    pub fn is_parsed(&self) -> bool {
        self.at.is_some()
    }

    /// Due at or before `now`. Unparseable values are never due.
    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.at.is_some_and(|at| at <= now)
    }

    /// Local wall-clock rendering, or the raw text when it never parsed.
    pub fn display(&self, offset: UtcOffset) -> String {
        let Some(at) = self.at else {
            return self.raw.clone();
        };
        at.to_offset(offset)
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]"
            ))
            .unwrap_or_else(|_| self.raw.clone())
    }

    /// Ascending by instant; unparseable values after parseable ones and equal to
    /// each other, so a secondary key decides among them.
    pub fn cmp_instant(&self, other: &Self) -> Ordering {
        match (self.at, other.at) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn parse_instant(raw: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }

    let local_formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];
    for format in local_formats {
        if let Ok(parsed) = PrimitiveDateTime::parse(raw, format) {
            return Some(parsed.assume_offset(offset));
        }
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_offset(offset))
}

#[cfg(test)]
mod tests {
    use super::Due;
    use std::cmp::Ordering;
    use time::macros::{datetime, offset};
    use time::{Duration, UtcOffset};

    #[test]
    fn parse_accepts_local_datetime_input() {
        let due = Due::parse("2024-01-01T09:00", offset!(+2));
        assert_eq!(due.at(), Some(datetime!(2024-01-01 09:00 +2)));
        assert_eq!(due.raw(), "2024-01-01T09:00");
    }

    #[test]
    fn parse_accepts_seconds_and_space_separator() {
        let with_t = Due::parse("2024-01-01T09:00:30", UtcOffset::UTC);
        let with_space = Due::parse("2024-01-01 09:00:30", UtcOffset::UTC);
        assert_eq!(with_t.at(), Some(datetime!(2024-01-01 09:00:30 UTC)));
        assert_eq!(with_t.at(), with_space.at());
    }

    #[test]
    fn parse_keeps_explicit_offset() {
        let due = Due::parse("2024-01-01T09:00:00-05:00", offset!(+9));
        assert_eq!(due.at(), Some(datetime!(2024-01-01 14:00 UTC)));
    }

    #[test]
    fn parse_date_only_means_local_midnight() {
        let due = Due::parse("2024-03-05", offset!(+1));
        assert_eq!(due.at(), Some(datetime!(2024-03-05 00:00 +1)));
    }

    #[test]
    fn unparseable_due_is_displayed_verbatim_and_never_due() {
        let due = Due::parse(" next tuesday ", UtcOffset::UTC);
        assert!(!due.is_parsed());
        assert_eq!(due.display(UtcOffset::UTC), "next tuesday");
        assert!(!due.is_due(datetime!(2999-01-01 00:00 UTC)));
    }

    #[test]
    fn is_due_includes_the_exact_instant() {
        let at = datetime!(2024-01-01 09:00 UTC);
        let due = Due::parse("2024-01-01T09:00:00Z", UtcOffset::UTC);
        assert!(due.is_due(at));
        assert!(!due.is_due(at - Duration::seconds(1)));
    }

    #[test]
    fn display_renders_in_requested_offset() {
        let due = Due::parse("2024-01-01T09:00:00Z", UtcOffset::UTC);
        assert_eq!(due.display(offset!(+1)), "2024-01-01 10:00");
    }

    #[test]
    fn cmp_instant_puts_unparseable_last() {
        let early = Due::parse("2024-01-01T08:00", UtcOffset::UTC);
        let late = Due::parse("2024-01-01T09:00", UtcOffset::UTC);
        let broken = Due::parse("soon", UtcOffset::UTC);
        let other_broken = Due::parse("later", UtcOffset::UTC);

        assert_eq!(early.cmp_instant(&late), Ordering::Less);
        assert_eq!(late.cmp_instant(&broken), Ordering::Less);
        assert_eq!(broken.cmp_instant(&early), Ordering::Greater);
        assert_eq!(broken.cmp_instant(&other_broken), Ordering::Equal);
    }
}
