/*
[INPUT]:  Field values of the active step
[OUTPUT]: Accept/reject decisions with user-facing messages
[POS]:    Validation layer - reusable step gate predicates
[UPDATE]: When adding new form constraints
*/

use std::sync::Arc;

use crate::error::ValidationError;
use crate::fields::Fields;

/// Predicate gating the advance past a step
pub type Validator = Arc<dyn Fn(&Fields) -> Result<(), ValidationError> + Send + Sync>;

/// Wrap a closure as a [`Validator`]
pub fn rule<F>(f: F) -> Validator
where
    F: Fn(&Fields) -> Result<(), ValidationError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Run rules in order; the first rejection wins
pub fn all(rules: Vec<Validator>) -> Validator {
    Arc::new(move |fields| rules.iter().try_for_each(|check| check(fields)))
}

/// Reject blank (empty or whitespace-only) values
pub fn required(key: &'static str, label: &'static str) -> Validator {
    Arc::new(move |fields| {
        if fields.value(key).trim().is_empty() {
            return Err(ValidationError::Required {
                label: label.to_string(),
            });
        }
        Ok(())
    })
}

/// Loose shape check: non-empty and contains `@`; the backend owns real verification
pub fn email(key: &'static str, label: &'static str) -> Validator {
    Arc::new(move |fields| {
        if !fields.value(key).trim().contains('@') {
            return Err(ValidationError::Invalid {
                label: label.to_string(),
            });
        }
        Ok(())
    })
}

pub fn min_len(key: &'static str, label: &'static str, min: usize) -> Validator {
    Arc::new(move |fields| {
        if fields.value(key).chars().count() < min {
            return Err(ValidationError::TooShort {
                label: label.to_string(),
                min,
            });
        }
        Ok(())
    })
}

/// Both fields must hold identical values
pub fn matching(a: &'static str, b: &'static str, message: &'static str) -> Validator {
    Arc::new(move |fields| {
        if fields.value(a) != fields.value(b) {
            return Err(ValidationError::Mismatch {
                message: message.to_string(),
            });
        }
        Ok(())
    })
}

/// Exactly `len` ASCII digits
pub fn exact_digits(key: &'static str, label: &'static str, len: usize) -> Validator {
    Arc::new(move |fields| {
        let value = fields.value(key);
        if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::CodeLength {
                label: label.to_string(),
                len,
            });
        }
        Ok(())
    })
}

/// Exact match against a reference value known to the view
pub fn equals_reference(
    key: &'static str,
    label: &'static str,
    expected: impl Into<String>,
) -> Validator {
    let expected = expected.into();
    Arc::new(move |fields| {
        if fields.value(key).trim() != expected {
            return Err(ValidationError::ReferenceMismatch {
                label: label.to_string(),
            });
        }
        Ok(())
    })
}

/// Delegates to [`crate::TaskChecklist::is_complete`]
pub fn checklist_complete() -> Validator {
    Arc::new(|fields| {
        let checklist = fields.checklist();
        if checklist.is_empty() {
            return Err(ValidationError::EmptyChecklist);
        }
        if !checklist.is_complete() {
            return Err(ValidationError::ChecklistIncomplete {
                completed: checklist.completed_count(),
                total: checklist.total(),
            });
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::TaskChecklist;
    use rstest::rstest;

    #[rstest]
    #[case("jane@example.com", true)]
    #[case(" jane@example ", true)]
    #[case("jane.example.com", false)]
    #[case("   ", false)]
    #[case("", false)]
    fn test_email(#[case] value: &str, #[case] ok: bool) {
        let check = email("email", "Email");
        assert_eq!(check(&Fields::new().with("email", value)).is_ok(), ok);
    }

    #[rstest]
    #[case("123456", true)]
    #[case("12345", false)]
    #[case("12345a", false)]
    #[case("1234567", false)]
    fn test_exact_digits(#[case] value: &str, #[case] ok: bool) {
        let check = exact_digits("code", "Code", 6);
        assert_eq!(check(&Fields::new().with("code", value)).is_ok(), ok);
    }

    #[test]
    fn test_all_reports_first_failure() {
        let check = all(vec![
            required("password", "Password"),
            min_len("password", "Password", 8),
            matching("password", "confirm", "Passwords do not match"),
        ]);

        let err = check(&Fields::new()).unwrap_err();
        assert_eq!(err.to_string(), "Password is required");

        let err = check(&Fields::new().with("password", "short")).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters");

        let fields = Fields::new()
            .with("password", "longenough")
            .with("confirm", "different!");
        let err = check(&fields).unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_required_rejects_whitespace() {
        let check = required("name", "Name");
        assert!(check(&Fields::new().with("name", "   ")).is_err());
        assert!(check(&Fields::new().with("name", "Ana")).is_ok());
    }

    #[test]
    fn test_checklist_complete() {
        let check = checklist_complete();
        assert_eq!(check(&Fields::new()), Err(ValidationError::EmptyChecklist));

        let mut fields = Fields::new().with_checklist(TaskChecklist::from_descriptions(["A", "B"]));
        fields.checklist_mut().toggle(1).unwrap();
        assert_eq!(
            check(&fields),
            Err(ValidationError::ChecklistIncomplete {
                completed: 1,
                total: 2
            })
        );

        fields.checklist_mut().toggle(2).unwrap();
        assert!(check(&fields).is_ok());
    }
}
