//! Login precondition.

use std::rc::Rc;

use crate::config::CoreConfig;
use crate::requirements::{Requirement, RequirementError};

pub struct LoginRequirement {
    config: Rc<CoreConfig>,
}

impl LoginRequirement {
    pub fn new(config: Rc<CoreConfig>) -> Self {
        LoginRequirement { config }
    }
}

impl Requirement for LoginRequirement {
    fn execute(&self) -> Result<(), RequirementError> {
        if self.config.is_logged_in() {
            Ok(())
        } else {
            Err(RequirementError::NotLoggedIn)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fails_without_a_token() {
        let req = LoginRequirement::new(Rc::new(CoreConfig::default()));
        let err = req.execute().unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }

    #[test]
    fn succeeds_with_a_token() {
        let config = CoreConfig { access_token: Some("tok".into()), ..Default::default() };
        assert!(LoginRequirement::new(Rc::new(config)).execute().is_ok());
    }
}
