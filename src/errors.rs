//! Error taxonomy for the command pipeline.
//!
//! Every failure a command can produce collapses into a [`CommandError`] at
//! the runner boundary. All variants except `Internal` are "quiet": they are
//! expected user-facing failures that print their message and a non-zero exit
//! status without an internal diagnostic.

use thiserror::Error;

use crate::api::ApiError;
use crate::requirements::RequirementError;

/// Terminal error for one command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Malformed arguments: wrong positional count or conflicting flags.
    /// Carries the command's rendered usage text.
    #[error("Incorrect Usage. {message}\n\n{usage}")]
    Usage { message: String, usage: String },

    /// A precondition was not met before the command body ran.
    #[error(transparent)]
    Requirement(#[from] RequirementError),

    /// The remote API reported failure. The server's message surfaces
    /// verbatim underneath the command's context line.
    #[error("{context}\n{source}")]
    Remote { context: String, source: ApiError },

    /// Expected, user-facing failure raised by a command body.
    #[error("{0}")]
    Failed(String),

    /// Anything not classified above. The only variant that surfaces a
    /// crash-style diagnostic.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CommandError {
    /// Wrap a remote API failure with a command-level context line.
    pub fn remote(context: impl Into<String>, source: ApiError) -> Self {
        CommandError::Remote { context: context.into(), source }
    }

    /// Quiet failures print their message only; non-quiet failures get the
    /// crash diagnostic block.
    pub fn is_quiet(&self) -> bool {
        !matches!(self, CommandError::Internal(_))
    }
}

/// Outcome of resolving and running a command by name.
#[derive(Debug, Error)]
pub enum RunError {
    /// The name matched neither a registered command nor an alias. The
    /// dispatch layer uses this to decide whether to delegate to a plugin.
    #[error("'{name}' is not a registered command")]
    UnknownCommand { name: String },

    /// The command was found but its pipeline or body failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_includes_usage_text() {
        let err = CommandError::Usage {
            message: "Cannot specify both --enable and --disable.".into(),
            usage: "nimbus update-buildpack BUILDPACK".into(),
        };
        let text = err.to_string();
        assert!(text.contains("Incorrect Usage."));
        assert!(text.contains("nimbus update-buildpack BUILDPACK"));
    }

    #[test]
    fn only_internal_errors_are_loud() {
        assert!(CommandError::Failed("nope".into()).is_quiet());
        assert!(!CommandError::Internal(anyhow::anyhow!("bug")).is_quiet());
    }
}
