//! Single error type for the whole run.
//!
//! Every failure carries the process exit code it maps to, so `main` can stay
//! a two-line match. The codes group failures by pipeline stage:
//!
//! | code | stage |
//! |------|-------|
//! | 2 | configuration / CLI |
//! | 4 | fetching from FRED |
//! | 5 | ratio computation |
//! | 6 | history storage |
//! | 7 | notification delivery |

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_FETCH: u8 = 4;
pub const EXIT_COMPUTE: u8 = 5;
pub const EXIT_STORAGE: u8 = 6;
pub const EXIT_NOTIFY: u8 = 7;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(EXIT_FETCH, message)
    }

    pub fn compute(message: impl Into<String>) -> Self {
        Self::new(EXIT_COMPUTE, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(EXIT_STORAGE, message)
    }

    pub fn notify(message: impl Into<String>) -> Self {
        Self::new(EXIT_NOTIFY, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_constructors_map_to_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), EXIT_CONFIG);
        assert_eq!(AppError::fetch("x").exit_code(), EXIT_FETCH);
        assert_eq!(AppError::compute("x").exit_code(), EXIT_COMPUTE);
        assert_eq!(AppError::storage("x").exit_code(), EXIT_STORAGE);
        assert_eq!(AppError::notify("x").exit_code(), EXIT_NOTIFY);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::storage("Failed to open history CSV 'h.csv': denied");
        assert_eq!(err.to_string(), "Failed to open history CSV 'h.csv': denied");
    }
}
