use thiserror::Error;

/// Errors raised while validating incoming activity and todo requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title cannot be null")]
    TitleRequired,
    #[error("activity_group_id cannot be null")]
    ActivityGroupIdRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::TitleRequired.to_string(),
            "title cannot be null"
        );
        assert_eq!(
            ValidationError::ActivityGroupIdRequired.to_string(),
            "activity_group_id cannot be null"
        );
    }
}
