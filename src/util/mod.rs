use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Msh Utility Extensions for `ExitStatus`
pub trait MshExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus to indicate *unsuccessful* program execution.
    fn from_failure() -> Self;

    /// Create an ExitStatus from a status code
    fn from_status(code: i32) -> Self;
}

impl MshExitStatusExt for ExitStatus {
    /// # Examples
    /// ```rust
    /// use msh_rs::MshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_success().success());
    /// ```
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    /// # Examples
    /// ```rust
    /// use msh_rs::MshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(!ExitStatus::from_failure().success());
    /// ```
    fn from_failure() -> Self {
        ExitStatus::from_status(1)
    }

    /// # Examples
    /// ```rust
    /// use msh_rs::MshExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_status(0).success());
    /// assert_eq!(ExitStatus::from_status(127).code(), Some(127));
    /// ```
    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw(code << 8)
    }
}

/// Maps any status code onto 0..=255 the way bash does for `exit n`.
pub fn code_like_u8(code: i32) -> i32 {
    if code < 0 {
        (256 + code % 256) % 256
    } else {
        code % 256
    }
}
