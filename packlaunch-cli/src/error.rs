use std::process::ExitCode;

use crate::args::ProfileOrigin;

/// Categories of application errors that can be matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorKind {
    /// Argument validation errors
    ArgValidation,
    /// Profile reading or parsing errors
    Profile,
    /// General IO errors
    IO,
    /// The archiver ran but did not produce a package
    Archive,
    /// A process could not be started, or its inputs were missing
    Launch,
    /// The profile could not be rendered for `show`
    Render,
}

/// Internal error type that contains all application error variants.
#[derive(Debug, thiserror::Error)]
pub enum AppErrorInner {
    #[error("Argument error: {0}")]
    ArgValidation(String),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("Failed to load profile: {origin}")]
    Profile {
        origin: ProfileOrigin,
        #[source]
        err: packlaunch::ProfileError,
    },
    #[error(transparent)]
    Session(#[from] packlaunch::Error),
    #[error("Failed to render profile")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The main application-level error type. We don't use `anyhow::Error` throughout as we still
/// care about the concrete error kind (for the exit code), so `anyhow` is only used to report the
/// error chain on the way out.
///
/// This type uses the newtype pattern to wrap a boxed inner error, reducing stack size.
#[derive(Debug)]
pub struct AppError(Box<AppErrorInner>, AppErrorKind);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl AppError {
    /// Create a new AppError with the given inner error and kind
    pub fn new(inner: AppErrorInner, kind: AppErrorKind) -> Self {
        Self(Box::new(inner), kind)
    }

    /// Get the error kind for pattern matching
    pub fn error_kind(&self) -> &AppErrorKind {
        &self.1
    }

    /// Create an argument validation error
    pub fn arg_validation(msg: String) -> Self {
        Self::new(AppErrorInner::ArgValidation(msg), AppErrorKind::ArgValidation)
    }

    /// Create a profile loading error
    pub fn profile(origin: ProfileOrigin, err: packlaunch::ProfileError) -> Self {
        Self::new(AppErrorInner::Profile { origin, err }, AppErrorKind::Profile)
    }

    /// Create a rendering error
    pub fn render<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(AppErrorInner::Render(Box::new(err)), AppErrorKind::Render)
    }

    /// The process exit status to report this error with
    pub fn exit_status(&self) -> u8 {
        match self.error_kind() {
            AppErrorKind::Archive => 1,
            AppErrorKind::ArgValidation | AppErrorKind::Profile => 2,
            _ => 3,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::new(AppErrorInner::IO(err), AppErrorKind::IO)
    }
}

impl From<packlaunch::Error> for AppError {
    fn from(err: packlaunch::Error) -> Self {
        let kind = match &err {
            packlaunch::Error::Subprocess { .. } | packlaunch::Error::PackageNotCreated { .. } => {
                AppErrorKind::Archive
            }
            _ => AppErrorKind::Launch,
        };
        Self::new(AppErrorInner::Session(err), kind)
    }
}

impl From<AppError> for ExitCode {
    fn from(error: AppError) -> Self {
        ExitCode::from(error.exit_status())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn archiver_failures_exit_with_one() {
        let err = AppError::from(packlaunch::Error::PackageNotCreated {
            path: "mod.pk3".into(),
        });
        assert_eq!(err.error_kind(), &AppErrorKind::Archive);
        assert_eq!(err.exit_status(), 1);
    }

    #[test]
    fn spawn_failures_exit_with_three() {
        let err = AppError::from(packlaunch::Error::Spawn {
            program: "7z".into(),
            err: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(err.error_kind(), &AppErrorKind::Launch);
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn argument_errors_exit_with_two() {
        let err = AppError::arg_validation("bad".to_string());
        assert_eq!(err.exit_status(), 2);
        let err = AppError::profile(
            ProfileOrigin::BuiltIn,
            packlaunch::ProfileError::ExecutableDir(std::io::Error::other("gone")),
        );
        assert_eq!(err.exit_status(), 2);
    }
}
