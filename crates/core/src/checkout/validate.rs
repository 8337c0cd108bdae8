//! The checkout form and its validation rules.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::format::{format_card_number, format_cvc, format_expiry};
use crate::types::{Country, Email};

/// Minimum digits in a card number (15 for Amex, 16 for everything else).
const MIN_CARD_DIGITS: usize = 15;

/// Length of a fully entered `MM/YY`.
const EXPIRY_LENGTH: usize = 5;

/// Minimum CVC length.
const MIN_CVC_DIGITS: usize = 3;

/// Payment details as entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub email: String,
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
    pub name: String,
    /// Unknown codes fall back to the default country.
    #[serde(deserialize_with = "country_or_default")]
    pub country: Country,
}

fn country_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Country, D::Error> {
    let code = String::deserialize(deserializer)?;
    Ok(code.parse().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "falling back to default country");
        Country::default()
    }))
}

impl CheckoutForm {
    /// Run the payment fields through their formatters.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            card_number: format_card_number(&self.card_number),
            expiry: format_expiry(&self.expiry),
            cvc: format_cvc(&self.cvc),
            ..self
        }
    }
}

/// A validated field on the checkout form. Country is never validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    Email,
    CardNumber,
    Expiry,
    Cvc,
    Name,
}

impl CheckoutField {
    /// Form field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::CardNumber => "card_number",
            Self::Expiry => "expiry",
            Self::Cvc => "cvc",
            Self::Name => "name",
        }
    }

    /// Message shown next to the field when it fails validation.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Email => "Enter a valid email",
            Self::CardNumber => "Card number is incomplete",
            Self::Expiry => "Expiry date is incomplete",
            Self::Cvc => "Security code is incomplete",
            Self::Name => "Enter cardholder name",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation messages. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<CheckoutField, &'static str>);

impl FieldErrors {
    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Whether a field failed.
    #[must_use]
    pub fn contains(&self, field: CheckoutField) -> bool {
        self.0.contains_key(&field)
    }

    /// Failing fields and their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    /// Drop the message for a field, e.g. once the shopper edits it.
    pub fn clear(&mut self, field: CheckoutField) {
        self.0.remove(&field);
    }

    fn reject(&mut self, field: CheckoutField) {
        self.0.insert(field, field.message());
    }
}

/// Check every field and collect a message for each one that fails.
///
/// ```
/// use ethos_core::checkout::{CheckoutForm, validate};
///
/// let form = CheckoutForm {
///     email: "barista@ethos.coffee".into(),
///     card_number: "4242 4242 4242 4242".into(),
///     expiry: "12/28".into(),
///     cvc: "123".into(),
///     name: "Ada Lovelace".into(),
///     ..CheckoutForm::default()
/// };
/// assert!(validate(&form).is_empty());
/// ```
#[must_use]
pub fn validate(form: &CheckoutForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if Email::parse(&form.email).is_err() {
        errors.reject(CheckoutField::Email);
    }

    let card_digits = form
        .card_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();
    if card_digits < MIN_CARD_DIGITS {
        errors.reject(CheckoutField::CardNumber);
    }

    if form.expiry.chars().count() < EXPIRY_LENGTH {
        errors.reject(CheckoutField::Expiry);
    }

    if form.cvc.chars().count() < MIN_CVC_DIGITS {
        errors.reject(CheckoutField::Cvc);
    }

    if form.name.trim().is_empty() {
        errors.reject(CheckoutField::Name);
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            email: "you@example.com".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/25".to_string(),
            cvc: "123".to_string(),
            name: "Jane Doe".to_string(),
            country: Country::Canada,
        }
    }

    #[test]
    fn test_unknown_country_falls_back_to_default() {
        let form: CheckoutForm =
            serde_json::from_str(r#"{"name": "Ada", "country": "XX"}"#).unwrap();
        assert_eq!(form.country, Country::UnitedStates);
        assert_eq!(form.name, "Ada");

        let form: CheckoutForm = serde_json::from_str(r#"{"country": "fr"}"#).unwrap();
        assert_eq!(form.country, Country::France);

        let form: CheckoutForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form.country, Country::UnitedStates);
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn test_every_field_fails_except_country() {
        let form = CheckoutForm {
            email: "bad".to_string(),
            card_number: "4242".to_string(),
            expiry: "12/2".to_string(),
            cvc: "1".to_string(),
            name: String::new(),
            country: Country::UnitedStates,
        };

        let errors = validate(&form);
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(CheckoutField::Email), Some("Enter a valid email"));
        assert_eq!(
            errors.get(CheckoutField::CardNumber),
            Some("Card number is incomplete")
        );
        assert_eq!(
            errors.get(CheckoutField::Expiry),
            Some("Expiry date is incomplete")
        );
        assert_eq!(
            errors.get(CheckoutField::Cvc),
            Some("Security code is incomplete")
        );
        assert_eq!(errors.get(CheckoutField::Name), Some("Enter cardholder name"));
    }

    #[test]
    fn test_long_email_passes_validation() {
        let form = CheckoutForm {
            email: format!("{}@example.com", "a".repeat(300)),
            ..valid_form()
        };
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn test_fifteen_digit_card_is_accepted() {
        let form = CheckoutForm {
            card_number: "3782 8224 6310 005".to_string(),
            ..valid_form()
        };
        assert!(!validate(&form).contains(CheckoutField::CardNumber));

        let form = CheckoutForm {
            card_number: "3782 8224 6310 00".to_string(),
            ..valid_form()
        };
        assert!(validate(&form).contains(CheckoutField::CardNumber));
    }

    #[test]
    fn test_whitespace_only_name_is_rejected() {
        let form = CheckoutForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(CheckoutField::Name));
    }

    #[test]
    fn test_four_digit_cvc_is_accepted() {
        let form = CheckoutForm {
            cvc: "1234".to_string(),
            ..valid_form()
        };
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn test_errors_iterate_in_form_order() {
        let form = CheckoutForm {
            name: String::new(),
            email: String::new(),
            ..valid_form()
        };
        let fields: Vec<_> = validate(&form).iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![CheckoutField::Email, CheckoutField::Name]);
    }

    #[test]
    fn test_clear_single_field() {
        let mut errors = validate(&CheckoutForm::default());
        errors.clear(CheckoutField::Email);
        assert!(!errors.contains(CheckoutField::Email));
        assert!(errors.contains(CheckoutField::Cvc));
    }

    #[test]
    fn test_normalized_formats_payment_fields() {
        let form = CheckoutForm {
            card_number: "4242424242424242".to_string(),
            expiry: "1225".to_string(),
            cvc: "12a34".to_string(),
            ..CheckoutForm::default()
        }
        .normalized();

        assert_eq!(form.card_number, "4242 4242 4242 4242");
        assert_eq!(form.expiry, "12/25");
        assert_eq!(form.cvc, "1234");
        assert_eq!(form.country, Country::UnitedStates);
    }
}
