use std::process::ExitCode;

/// Process exit status.
///
/// - `Success` (0): nothing left to do, no errors
/// - `Failure` (1): errors were reported, or a dry run found literals to rewrite
/// - `Error` (2): the command itself failed (bad config, unreadable manifest)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
