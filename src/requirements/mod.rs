//! Precondition checks that run before a command body.
//!
//! A command derives its requirements from parsed arguments; the runner then
//! executes them strictly in order, stopping at the first failure. Later
//! requirements may assume state established by earlier ones, so order is
//! part of the contract.

mod buildpack;
mod login;
mod target;

pub use buildpack::BuildpackRequirement;
pub use login::LoginRequirement;
pub use target::TargetedSpaceRequirement;

use std::rc::Rc;

use thiserror::Error;

use crate::api::{ApiError, BuildpackRepository};
use crate::config::CoreConfig;
use crate::NAME;

/// Why a precondition did not hold. Messages surface to the user verbatim.
#[derive(Debug, Error)]
pub enum RequirementError {
    #[error("Not logged in. Use '{tool} login' to log in.", tool = NAME)]
    NotLoggedIn,

    #[error("No org and space targeted. Use '{tool} target -o ORG -s SPACE'.", tool = NAME)]
    NoSpaceTargeted,

    /// A remote lookup failed: entity missing or the API rejected the call.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A single precondition: succeeds or reports why not. Implementations that
/// fetch an entity retain it for the command that created them.
pub trait Requirement {
    fn execute(&self) -> Result<(), RequirementError>;
}

impl std::fmt::Debug for dyn Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Requirement")
    }
}

/// Builds requirement values from the process-lifetime config snapshot and
/// repository handles. One factory serves every invocation.
pub struct RequirementsFactory {
    config: Rc<CoreConfig>,
    buildpack_repo: Rc<dyn BuildpackRepository>,
}

impl RequirementsFactory {
    pub fn new(config: Rc<CoreConfig>, buildpack_repo: Rc<dyn BuildpackRepository>) -> Self {
        RequirementsFactory { config, buildpack_repo }
    }

    pub fn login(&self) -> Rc<dyn Requirement> {
        Rc::new(LoginRequirement::new(self.config.clone()))
    }

    pub fn targeted_space(&self) -> Rc<dyn Requirement> {
        Rc::new(TargetedSpaceRequirement::new(self.config.clone()))
    }

    /// Named-entity requirement: the buildpack must exist, and the fetched
    /// record stays available through [`BuildpackRequirement::buildpack`].
    pub fn buildpack(&self, name: &str) -> Rc<BuildpackRequirement> {
        Rc::new(BuildpackRequirement::new(name, self.buildpack_repo.clone()))
    }
}
