/// Error type carried through the whole pipeline.
///
/// Every error maps to a process exit code:
/// - `2`: usage/input problems (missing file, bad column, invalid flag values)
/// - `3`: no usable data
/// - `4`: numeric or runtime failures
#[derive(Clone, thiserror::Error)]
#[error("{message}")]
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

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = AppError::new(3, "No measurements.");
        assert_eq!(err.to_string(), "No measurements.");
        assert_eq!(err.exit_code(), 3);
    }
}
