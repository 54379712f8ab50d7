//! Raw form values to `TodoFields`.
//!
//! The form posts `title`, `description`, `due_day`, `due_month` and
//! `due_year`. Date selects start on the placeholders `"Day"`, `"Month"` and
//! `"Year"`; if any of them is still showing, the due date is left out
//! entirely.

use thiserror::Error;
use todo_sync_core::todo::TodoFields;

/// Shortest title the form accepts
pub const MIN_TITLE_LEN: usize = 3;

const PLACEHOLDERS: [&str; 3] = ["Day", "Month", "Year"];

/// Rejected form input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Title shorter than [`MIN_TITLE_LEN`] characters after trimming
    #[error("You must enter a title at least {MIN_TITLE_LEN} characters long.")]
    TitleTooShort,

    /// Month is not a number between 1 and 12
    #[error("invalid due month: {0}")]
    InvalidMonth(String),

    /// Year is not a number
    #[error("invalid due year: {0}")]
    InvalidYear(String),
}

/// Trim `title` and check its length
///
/// # Errors
///
/// Returns [`FormError::TitleTooShort`] for titles under three characters.
pub fn validate_title(title: &str) -> Result<String, FormError> {
    let title = title.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(FormError::TitleTooShort);
    }
    Ok(title.to_string())
}

/// Parse raw `(name, value)` pairs from the todo form
///
/// Keys may carry the `due_` prefix. Unknown keys are ignored.
///
/// # Errors
///
/// Returns a [`FormError`] when the title is too short or a non-placeholder
/// month/year does not parse.
pub fn parse_form<I, K, V>(values: I) -> Result<TodoFields, FormError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut title = None;
    let mut description = None;
    let mut day = None;
    let mut month = None;
    let mut year = None;

    for (key, value) in values {
        let value = value.as_ref().trim().to_string();
        let key = key.as_ref();
        match key.strip_prefix("due_").unwrap_or(key) {
            "title" => title = Some(value),
            "description" => description = Some(value),
            "day" => day = Some(value),
            "month" => month = Some(value),
            "year" => year = Some(value),
            _ => {},
        }
    }

    let mut fields = TodoFields::titled(validate_title(title.as_deref().unwrap_or_default())?);
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        fields = fields.with_description(description);
    }

    let placeholder_shown = [&day, &month, &year]
        .iter()
        .any(|part| part.as_deref().is_some_and(|v| PLACEHOLDERS.contains(&v)));
    if placeholder_shown {
        return Ok(fields);
    }

    match (unset_if_blank(month), unset_if_blank(year)) {
        (Some(month), Some(year)) => {
            let month = parse_month(&month)?;
            let year = year
                .parse::<u16>()
                .map_err(|_| FormError::InvalidYear(year.clone()))?;
            Ok(fields.with_due(month, year))
        },
        _ => Ok(fields),
    }
}

fn unset_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_month(month: &str) -> Result<u8, FormError> {
    month
        .parse::<u8>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| FormError::InvalidMonth(month.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn full_form() {
        let fields = parse_form([
            ("title", " File taxes "),
            ("description", "state and federal"),
            ("due_day", "15"),
            ("due_month", "04"),
            ("due_year", "2024"),
        ])
        .unwrap();

        assert_eq!(
            fields,
            TodoFields::titled("File taxes")
                .with_description("state and federal")
                .with_due(4, 2024)
        );
    }

    #[test]
    fn any_placeholder_drops_the_due_date() {
        let fields = parse_form([
            ("title", "Taxes"),
            ("due_day", "Day"),
            ("due_month", "4"),
            ("due_year", "2024"),
        ])
        .unwrap();

        assert_eq!(fields.due_month, None);
        assert_eq!(fields.due_year, None);
    }

    #[test]
    fn half_date_is_dropped() {
        let fields = parse_form([("title", "Taxes"), ("month", "4"), ("year", "")]).unwrap();
        assert_eq!(fields.due_month, None);
        assert_eq!(fields.due_year, None);
    }

    #[test]
    fn due_prefix_is_stripped_once() {
        let fields = parse_form([
            ("title", "Taxes"),
            ("due_due_month", "4"),
            ("due_year", "2024"),
        ])
        .unwrap();

        assert_eq!(fields.due_month, None);
        assert_eq!(fields.due_year, None);
    }

    #[test]
    fn blank_description_is_unset() {
        let fields = parse_form([("title", "Taxes"), ("description", "  ")]).unwrap();
        assert_eq!(fields.description, None);
    }

    #[test]
    fn short_or_missing_title_is_rejected() {
        assert_eq!(parse_form([("title", " ab ")]), Err(FormError::TitleTooShort));
        assert_eq!(
            parse_form([("description", "no title")]),
            Err(FormError::TitleTooShort)
        );
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert_eq!(
            parse_form([("title", "Taxes"), ("month", "13"), ("year", "2024")]),
            Err(FormError::InvalidMonth("13".to_string()))
        );
        assert_eq!(
            parse_form([("title", "Taxes"), ("month", "3"), ("year", "soon")]),
            Err(FormError::InvalidYear("soon".to_string()))
        );
    }
}
