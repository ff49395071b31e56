pub mod config;
pub mod due;
pub mod error;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod ordering;
pub mod registry;
pub mod store;
pub mod timer;
pub mod tracker;
pub mod view;

pub use error::AppError;
pub use tracker::{TaskChange, Tracker};

#[cfg(test)]
mod tests {
    use crate::error::AppError;

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::validation("missing name");
        assert_eq!(err.code(), "validation");
        assert_eq!(err.to_string(), "validation - missing name");
        assert!(err.is_user_facing());
    }

    #[test]
    fn io_errors_are_not_user_facing() {
        let err = AppError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.code(), "io_error");
        assert!(!err.is_user_facing());
        assert!(AppError::not_found("task-1").is_user_facing());
    }
}
