//! Targeted org/space precondition.

use std::rc::Rc;

use crate::config::CoreConfig;
use crate::requirements::{Requirement, RequirementError};

pub struct TargetedSpaceRequirement {
    config: Rc<CoreConfig>,
}

impl TargetedSpaceRequirement {
    pub fn new(config: Rc<CoreConfig>) -> Self {
        TargetedSpaceRequirement { config }
    }
}

impl Requirement for TargetedSpaceRequirement {
    fn execute(&self) -> Result<(), RequirementError> {
        if self.config.has_target() {
            Ok(())
        } else {
            Err(RequirementError::NoSpaceTargeted)
        }
    }
}
