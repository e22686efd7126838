//! Property-based tests for keyward-common

use keyward_common::{
    EmailValidator, LogLevel, NonEmptyListValidator, NonEmptyStringValidator, ValidationError,
    Validator,
};
use proptest::prelude::*;

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(vec![
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ])
}

// ============================================================================
// Log levels
// ============================================================================

proptest! {
    #[test]
    fn prop_log_level_display_parses_back(level in level_strategy()) {
        prop_assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
    }

    #[test]
    fn prop_log_level_parse_ignores_case_and_padding(
        level in level_strategy(),
        upper_mask in prop::collection::vec(any::<bool>(), 5),
        pad in " {0,3}",
    ) {
        let mixed: String = level
            .as_str()
            .chars()
            .zip(upper_mask.iter().cycle())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect();
        let input = format!("{pad}{mixed}{pad}");
        prop_assert_eq!(input.parse::<LogLevel>(), Ok(level));
    }

    #[test]
    fn prop_unknown_log_level_rejected(name in "[a-z]{6,10}") {
        prop_assume!(name != "warning");
        prop_assert!(name.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Validators
// ============================================================================

proptest! {
    #[test]
    fn prop_blank_strings_are_required(blank in "[ \t\n]{0,6}") {
        let result = NonEmptyStringValidator::new("name").validate(blank.as_str());
        prop_assert_eq!(result, Err(ValidationError::Required { field: "name".to_string() }));
    }

    #[test]
    fn prop_padded_text_is_accepted(pad in " {0,3}", text in "[a-zA-Z0-9]{1,12}") {
        let value = format!("{pad}{text}{pad}");
        prop_assert!(NonEmptyStringValidator::new("name").validate(value.as_str()).is_ok());
    }

    #[test]
    fn prop_well_formed_emails_pass(local in "[a-z0-9.]{1,10}", domain in "[a-z]{1,10}\\.[a-z]{2,4}") {
        let email = format!("{local}@{domain}");
        prop_assert!(EmailValidator::new("email").validate(email.as_str()).is_ok());
    }

    #[test]
    fn prop_emails_without_at_fail(value in "[a-z0-9.]{1,20}") {
        let result = EmailValidator::new("email").validate(value.as_str());
        let is_format_error = matches!(result, Err(ValidationError::Format { .. }));
        prop_assert!(is_format_error);
    }

    #[test]
    fn prop_list_validator_only_rejects_empty(items in prop::collection::vec(any::<u8>(), 0..5)) {
        let result = NonEmptyListValidator::new("roles").validate(items.as_slice());
        prop_assert_eq!(result.is_ok(), !items.is_empty());
    }

    #[test]
    fn prop_from_list_keeps_every_field(count in 0usize..5) {
        let errors: Vec<ValidationError> = (0..count)
            .map(|i| ValidationError::Required { field: format!("f{i}") })
            .collect();
        match ValidationError::from_list(errors) {
            Ok(()) => prop_assert_eq!(count, 0),
            Err(error) => {
                let expected: Vec<String> = (0..count).map(|i| format!("f{i}")).collect();
                prop_assert_eq!(error.fields(), expected.iter().map(String::as_str).collect::<Vec<_>>());
            }
        }
    }
}
