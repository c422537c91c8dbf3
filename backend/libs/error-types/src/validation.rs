//! Request validation errors
//!
//! Converts `validator` derive failures into the shared `Validation`
//! variant so every service reports field errors the same way.

use crate::{FieldError, ServiceError};

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid")),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        let message = field_errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        ServiceError::Validation {
            message,
            field_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "name must be at least 3 characters"))]
        name: String,
        #[validate(range(min = 0, max = 100))]
        discount: i32,
    }

    #[test]
    fn test_field_errors_are_collected() {
        let sample = Sample {
            name: "ab".into(),
            discount: 150,
        };
        let err = ServiceError::from(sample.validate().unwrap_err());

        match err {
            ServiceError::Validation {
                message,
                field_errors,
            } => {
                assert_eq!(field_errors.len(), 2);
                assert_eq!(field_errors[0].field, "discount");
                assert_eq!(field_errors[0].code, "range");
                assert_eq!(field_errors[1].field, "name");
                assert!(message.contains("name must be at least 3 characters"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
