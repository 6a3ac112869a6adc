//! Bridges `validator` derive output into the error envelope.

use shared::error::AppError;

/// Flatten `validator` derive failures into one envelope-ready error.
pub fn validation_failed(errors: validator::ValidationErrors) -> AppError {
    let mut err = AppError::validation("Validation failed");
    for (field, field_errors) in errors.field_errors() {
        for fe in field_errors {
            let line = match &fe.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", fe.code),
            };
            err = err.with_detail(line);
        }
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
        #[validate(range(min = 0.0, message = "price must not be negative"))]
        price: f64,
    }

    #[test]
    fn test_each_failed_field_becomes_a_detail_line() {
        let bad = Payload { name: String::new(), price: -1.0 };
        let err = validation_failed(bad.validate().unwrap_err());

        assert_eq!(err.kind, ErrorKind::ValidationFailed);
        assert_eq!(err.details.len(), 2);
        assert!(err.details.iter().any(|d| d.contains("name must not be empty")));
        assert!(err.details.iter().any(|d| d.contains("price must not be negative")));
    }

    #[test]
    fn test_unlabelled_rules_fall_back_to_the_code() {
        #[derive(Debug, Validate)]
        struct Bare {
            #[validate(length(min = 3))]
            code: String,
        }

        let err = validation_failed(Bare { code: "ab".into() }.validate().unwrap_err());
        assert!(err.details.iter().any(|d| d.contains("code: length")));
    }
}
