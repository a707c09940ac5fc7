//! Filter bar payloads.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::filter::{FilterCriteria, FilterField, FilterUpdate};
use crate::forms::FormError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Empty input clears the date.
fn parse_date(raw: &str) -> Result<Option<NaiveDate>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FormError::InvalidDate(raw.to_string()))
}

fn parse_toggle(raw: &str) -> Result<bool, FormError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "off" | "0" => Ok(false),
        "true" | "on" | "1" => Ok(true),
        _ => Err(FormError::InvalidToggle(raw.to_string())),
    }
}

/// Single input event: the input's name and its current value.
#[derive(Clone, Debug, Deserialize)]
pub struct FilterInput {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl FilterInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses `field=value`.
    pub fn parse_pair(pair: &str) -> Result<Self, FormError> {
        match pair.split_once('=') {
            Some((name, value)) => Ok(Self::new(name.trim(), value)),
            None => Err(FormError::UnknownField(pair.to_string())),
        }
    }

    pub fn field(&self) -> Result<FilterField, FormError> {
        self.name
            .parse()
            .map_err(|_| FormError::UnknownField(self.name.clone()))
    }
}

impl TryFrom<FilterInput> for FilterUpdate {
    type Error = FormError;

    fn try_from(input: FilterInput) -> Result<Self, Self::Error> {
        let update = match input.field()? {
            FilterField::Name => FilterUpdate::Name(input.value),
            FilterField::Address => FilterUpdate::Address(input.value),
            FilterField::VaccineType => FilterUpdate::VaccineType(input.value),
            FilterField::StartDate => FilterUpdate::StartDate(parse_date(&input.value)?),
            FilterField::ClosingDate => FilterUpdate::ClosingDate(parse_date(&input.value)?),
            FilterField::Archived => FilterUpdate::Archived(parse_toggle(&input.value)?),
        };
        Ok(update)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
/// Every filter input submitted at once.
pub struct FilterForm {
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: String,
    #[validate(length(max = 40))]
    pub vaccine_type: String,
    pub start_date: String,
    pub closing_date: String,
    pub archived: bool,
}

impl FilterForm {
    /// Validates the form and splits it into one update per field.
    pub fn into_updates(self) -> Result<Vec<FilterUpdate>, FormError> {
        let criteria = FilterCriteria::try_from(self)?;
        Ok(vec![
            FilterUpdate::Name(criteria.name),
            FilterUpdate::Address(criteria.address),
            FilterUpdate::VaccineType(criteria.vaccine_type),
            FilterUpdate::StartDate(criteria.start_date),
            FilterUpdate::ClosingDate(criteria.closing_date),
            FilterUpdate::Archived(criteria.archived),
        ])
    }
}

impl TryFrom<FilterForm> for FilterCriteria {
    type Error = FormError;

    fn try_from(form: FilterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(FilterCriteria {
            start_date: parse_date(&form.start_date)?,
            closing_date: parse_date(&form.closing_date)?,
            name: form.name,
            address: form.address,
            vaccine_type: form.vaccine_type,
            archived: form.archived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_inputs_keep_their_value() {
        let update = FilterUpdate::try_from(FilterInput::new("name", " North ")).unwrap();
        assert_eq!(update, FilterUpdate::Name(" North ".to_string()));
    }

    #[test]
    fn date_inputs_parse_iso_dates() {
        let update = FilterUpdate::try_from(FilterInput::new("startDate", "2024-05-01")).unwrap();
        assert_eq!(
            update,
            FilterUpdate::StartDate(NaiveDate::from_ymd_opt(2024, 5, 1))
        );

        let cleared = FilterUpdate::try_from(FilterInput::new("closingDate", "")).unwrap();
        assert_eq!(cleared, FilterUpdate::ClosingDate(None));

        let err = FilterUpdate::try_from(FilterInput::new("startDate", "05/01/2024")).unwrap_err();
        assert!(matches!(err, FormError::InvalidDate(_)));
    }

    #[test]
    fn toggle_accepts_checkbox_values() {
        let on = FilterUpdate::try_from(FilterInput::new("archived", "on")).unwrap();
        assert_eq!(on, FilterUpdate::Archived(true));
        let off = FilterUpdate::try_from(FilterInput::new("archived", "false")).unwrap();
        assert_eq!(off, FilterUpdate::Archived(false));
        assert!(FilterUpdate::try_from(FilterInput::new("archived", "maybe")).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = FilterUpdate::try_from(FilterInput::new("brand", "x")).unwrap_err();
        assert!(matches!(err, FormError::UnknownField(name) if name == "brand"));
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        let input = FilterInput::parse_pair("name=a=b").unwrap();
        assert_eq!(input.name, "name");
        assert_eq!(input.value, "a=b");
        assert!(FilterInput::parse_pair("name").is_err());
    }

    #[test]
    fn form_converts_to_criteria() {
        let form: FilterForm = serde_json::from_str(
            r#"{"name":"North","vaccineType":"Pfizer","startDate":"2024-05-01","archived":true}"#,
        )
        .unwrap();
        let criteria = FilterCriteria::try_from(form).unwrap();
        assert_eq!(criteria.name, "North");
        assert_eq!(criteria.vaccine_type, "Pfizer");
        assert_eq!(criteria.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(criteria.closing_date, None);
        assert!(criteria.archived);
    }

    #[test]
    fn overlong_vaccine_type_fails_validation() {
        let form = FilterForm {
            vaccine_type: "x".repeat(41),
            ..FilterForm::default()
        };
        assert!(matches!(
            FilterCriteria::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn form_splits_into_one_update_per_field() {
        let updates = FilterForm::default().into_updates().unwrap();
        assert_eq!(updates.len(), 6);
        assert_eq!(updates[5], FilterUpdate::Archived(false));
    }
}
