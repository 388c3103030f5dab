//! Checkout form validation and card classification.
//!
//! Both payment forms are validated on every change, not just on submit:
//! each schema is an explicit per-field rule table (field name → check →
//! message) evaluated into a field-keyed error map. Submission stays gated
//! while the map is non-empty.
//!
//! Card brand detection is a side-effect-free classification run per
//! keystroke; formatting into groups of four digits is independent of
//! validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Email;

/// Field-keyed validation errors. Empty map means the form can be submitted.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// One entry in a form's rule table.
struct Rule<T> {
    field: &'static str,
    message: &'static str,
    check: fn(&T) -> bool,
}

fn run_rules<T>(form: &T, rules: &[Rule<T>]) -> FieldErrors {
    rules
        .iter()
        .filter(|rule| !(rule.check)(form))
        .map(|rule| (rule.field, rule.message))
        .collect()
}

fn non_empty(s: &str) -> bool {
    !s.trim().is_empty()
}

fn valid_email(s: &str) -> bool {
    Email::parse(s.trim()).is_ok()
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

/// Minimum digits in a card number.
pub const MIN_CARD_DIGITS: usize = 16;
/// Minimum length of the expiration field (`MM/YY`).
pub const MIN_EXPIRATION_LEN: usize = 5;
/// Minimum length of the CVC field.
pub const MIN_CVC_LEN: usize = 3;

// =============================================================================
// Pay-now (card) form
// =============================================================================

/// The "pay now" card payment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayNowForm {
    pub email: String,
    pub card_number: String,
    pub expiration: String,
    pub cvc: String,
    pub cardholder_name: String,
    pub billing_address: String,
    pub city: String,
    pub zip: String,
    pub state: String,
    pub country: String,
    pub save_address: bool,
}

const PAY_NOW_RULES: &[Rule<PayNowForm>] = &[
    Rule {
        field: "email",
        message: "Enter a valid email address",
        check: |f| valid_email(&f.email),
    },
    Rule {
        field: "cardNumber",
        message: "Card number must have at least 16 digits",
        check: |f| digit_count(&f.card_number) >= MIN_CARD_DIGITS,
    },
    Rule {
        field: "expiration",
        message: "Enter the expiration as MM/YY",
        check: |f| f.expiration.trim().len() >= MIN_EXPIRATION_LEN,
    },
    Rule {
        field: "cvc",
        message: "CVC must have at least 3 digits",
        check: |f| f.cvc.trim().len() >= MIN_CVC_LEN,
    },
    Rule {
        field: "cardholderName",
        message: "Cardholder name is required",
        check: |f| non_empty(&f.cardholder_name),
    },
    Rule {
        field: "billingAddress",
        message: "Billing address is required",
        check: |f| non_empty(&f.billing_address),
    },
    Rule {
        field: "city",
        message: "City is required",
        check: |f| non_empty(&f.city),
    },
    Rule {
        field: "zip",
        message: "ZIP code is required",
        check: |f| non_empty(&f.zip),
    },
    Rule {
        field: "state",
        message: "State is required",
        check: |f| non_empty(&f.state),
    },
    Rule {
        field: "country",
        message: "Country is required",
        check: |f| non_empty(&f.country),
    },
];

impl PayNowForm {
    /// Evaluate the rule table.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        run_rules(self, PAY_NOW_RULES)
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// =============================================================================
// Cash-on-delivery form
// =============================================================================

/// The cash-on-delivery form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashOnDeliveryForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
    pub save_address: bool,
}

const COD_RULES: &[Rule<CashOnDeliveryForm>] = &[
    Rule {
        field: "email",
        message: "Enter a valid email address",
        check: |f| valid_email(&f.email),
    },
    Rule {
        field: "firstName",
        message: "First name is required",
        check: |f| non_empty(&f.first_name),
    },
    Rule {
        field: "lastName",
        message: "Last name is required",
        check: |f| non_empty(&f.last_name),
    },
    Rule {
        field: "address",
        message: "Address is required",
        check: |f| non_empty(&f.address),
    },
    Rule {
        field: "city",
        message: "City is required",
        check: |f| non_empty(&f.city),
    },
    Rule {
        field: "postalCode",
        message: "Postal code is required",
        check: |f| non_empty(&f.postal_code),
    },
    Rule {
        field: "state",
        message: "State is required",
        check: |f| non_empty(&f.state),
    },
    Rule {
        field: "country",
        message: "Country is required",
        check: |f| non_empty(&f.country),
    },
];

impl CashOnDeliveryForm {
    /// Evaluate the rule table.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        run_rules(self, COD_RULES)
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// =============================================================================
// Card classification & formatting
// =============================================================================

/// Card issuer, detected from the number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
}

/// Classify a card number by issuer prefix.
///
/// Non-digits are ignored, so formatted input (`"4111 1111 ..."`) classifies
/// the same as raw digits. Prefixes: `4` → Visa, `51`–`55` → Mastercard,
/// `34`/`37` → Amex. Anything else clears the classification.
#[must_use]
pub fn detect_card_brand(input: &str) -> Option<CardBrand> {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();

    match digits.first() {
        Some('4') => Some(CardBrand::Visa),
        Some('5') => match digits.get(1) {
            Some('1'..='5') => Some(CardBrand::Mastercard),
            _ => None,
        },
        Some('3') => match digits.get(1) {
            Some('4' | '7') => Some(CardBrand::Amex),
            _ => None,
        },
        _ => None,
    }
}

/// Re-format a card number into groups of four digits as the user types.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Saved address
// =============================================================================

/// Address record persisted when the customer opts into "save address".
///
/// Field names are unified across both form variants: the pay-now billing
/// address and ZIP map onto `address`/`zip`, and the cardholder name is
/// split into first/last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedAddress {
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedAddress {
    /// Build the unified record from a pay-now form.
    #[must_use]
    pub fn from_pay_now(form: &PayNowForm, saved_at: DateTime<Utc>) -> Self {
        let (first_name, last_name) = split_name(&form.cardholder_name);
        Self {
            email: form.email.trim().to_owned(),
            address: form.billing_address.trim().to_owned(),
            city: form.city.trim().to_owned(),
            state: form.state.trim().to_owned(),
            zip: form.zip.trim().to_owned(),
            country: form.country.trim().to_owned(),
            first_name,
            last_name,
            saved_at: Some(saved_at),
        }
    }

    /// Build the unified record from a cash-on-delivery form.
    #[must_use]
    pub fn from_cash_on_delivery(form: &CashOnDeliveryForm, saved_at: DateTime<Utc>) -> Self {
        Self {
            email: form.email.trim().to_owned(),
            address: form.address.trim().to_owned(),
            city: form.city.trim().to_owned(),
            state: form.state.trim().to_owned(),
            zip: form.postal_code.trim().to_owned(),
            country: form.country.trim().to_owned(),
            first_name: form.first_name.trim().to_owned(),
            last_name: form.last_name.trim().to_owned(),
            saved_at: Some(saved_at),
        }
    }
}

/// Split a full name at the first whitespace into (first, rest).
fn split_name(full: &str) -> (String, String) {
    let mut parts = full.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or_default().to_owned();
    let last = parts.next().unwrap_or_default().trim().to_owned();
    (first, last)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_pay_now() -> PayNowForm {
        PayNowForm {
            email: "jenny@example.com".to_owned(),
            card_number: "4111 1111 1111 1111".to_owned(),
            expiration: "12/28".to_owned(),
            cvc: "123".to_owned(),
            cardholder_name: "Jenny Rosen".to_owned(),
            billing_address: "27 Fredrick Ave".to_owned(),
            city: "Los Angeles".to_owned(),
            zip: "94025".to_owned(),
            state: "California".to_owned(),
            country: "United States".to_owned(),
            save_address: false,
        }
    }

    fn filled_cod() -> CashOnDeliveryForm {
        CashOnDeliveryForm {
            email: "jenny@example.com".to_owned(),
            first_name: "Jenny".to_owned(),
            last_name: "Rosen".to_owned(),
            address: "27 Fredrick Ave".to_owned(),
            city: "Los Angeles".to_owned(),
            postal_code: "94025".to_owned(),
            state: "California".to_owned(),
            country: "United States".to_owned(),
            save_address: false,
        }
    }

    #[test]
    fn test_empty_pay_now_blocks_submission() {
        let form = PayNowForm::default();
        let errors = form.validate();
        assert!(!form.is_valid());
        // Every field in the schema reports an error
        assert_eq!(errors.len(), 10);
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("cardNumber"));
    }

    #[test]
    fn test_filled_pay_now_enables_submission() {
        assert!(filled_pay_now().is_valid());
    }

    #[test]
    fn test_clearing_one_field_re_disables() {
        let mut form = filled_pay_now();
        form.city = String::new();
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("city"), Some(&"City is required"));
    }

    #[test]
    fn test_card_number_counts_digits_not_spaces() {
        let mut form = filled_pay_now();
        // 15 digits with separators mixed in
        form.card_number = "4111 1111 1111 111".to_owned();
        assert!(form.validate().contains_key("cardNumber"));
    }

    #[test]
    fn test_short_expiration_and_cvc() {
        let mut form = filled_pay_now();
        form.expiration = "1/28".to_owned();
        form.cvc = "12".to_owned();
        let errors = form.validate();
        assert!(errors.contains_key("expiration"));
        assert!(errors.contains_key("cvc"));
    }

    #[test]
    fn test_invalid_email_shape() {
        let mut form = filled_pay_now();
        form.email = "not-an-email".to_owned();
        assert!(form.validate().contains_key("email"));
    }

    #[test]
    fn test_empty_cod_blocks_submission() {
        let form = CashOnDeliveryForm::default();
        assert_eq!(form.validate().len(), 8);
    }

    #[test]
    fn test_filled_cod_enables_submission() {
        assert!(filled_cod().is_valid());
    }

    #[test]
    fn test_cod_field_keys_are_camel_case() {
        let mut form = filled_cod();
        form.postal_code = String::new();
        form.first_name = String::new();
        let errors = form.validate();
        assert!(errors.contains_key("postalCode"));
        assert!(errors.contains_key("firstName"));
    }

    #[test]
    fn test_detect_card_brand() {
        assert_eq!(detect_card_brand("4111111111111111"), Some(CardBrand::Visa));
        assert_eq!(
            detect_card_brand("5500000000000000"),
            Some(CardBrand::Mastercard)
        );
        assert_eq!(detect_card_brand("340000000000000"), Some(CardBrand::Amex));
        assert_eq!(detect_card_brand("370000000000000"), Some(CardBrand::Amex));
        assert_eq!(detect_card_brand("9999999999999999"), None);
        assert_eq!(detect_card_brand(""), None);
    }

    #[test]
    fn test_detect_card_brand_edge_prefixes() {
        // 50 and 56 fall outside the Mastercard range
        assert_eq!(detect_card_brand("5000"), None);
        assert_eq!(detect_card_brand("5600"), None);
        // 35 is not Amex
        assert_eq!(detect_card_brand("3500"), None);
        // Formatted input classifies the same as raw digits
        assert_eq!(detect_card_brand("4111 1111"), Some(CardBrand::Visa));
    }

    #[test]
    fn test_format_card_number_groups_of_four() {
        assert_eq!(
            format_card_number("4111111111111111"),
            "4111 1111 1111 1111"
        );
        assert_eq!(format_card_number("41111"), "4111 1");
        assert_eq!(format_card_number("4111-1111-19"), "4111 1111 19");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_saved_address_from_pay_now_unifies_fields() {
        let form = filled_pay_now();
        let saved = SavedAddress::from_pay_now(&form, Utc::now());

        assert_eq!(saved.address, "27 Fredrick Ave");
        assert_eq!(saved.zip, "94025");
        assert_eq!(saved.first_name, "Jenny");
        assert_eq!(saved.last_name, "Rosen");
        assert!(saved.saved_at.is_some());
    }

    #[test]
    fn test_saved_address_from_cod() {
        let form = filled_cod();
        let saved = SavedAddress::from_cash_on_delivery(&form, Utc::now());

        assert_eq!(saved.zip, "94025");
        assert_eq!(saved.first_name, "Jenny");
        assert_eq!(saved.last_name, "Rosen");
    }

    #[test]
    fn test_split_name_single_token() {
        let (first, last) = split_name("Cher");
        assert_eq!(first, "Cher");
        assert_eq!(last, "");
    }

    #[test]
    fn test_forms_deserialize_from_camel_case() {
        let form: PayNowForm = serde_json::from_str(
            r#"{"email":"a@b.c","cardNumber":"4111111111111111","saveAddress":true}"#,
        )
        .unwrap();
        assert_eq!(form.email, "a@b.c");
        assert!(form.save_address);
        // Missing fields default to empty and fail validation
        assert!(!form.is_valid());
    }
}
