//! Named-buildpack precondition.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{Buildpack, BuildpackRepository};
use crate::requirements::{Requirement, RequirementError};

/// Fetches the named buildpack and caches it for the command body. The cache
/// lives for one invocation; the command that created this requirement is its
/// only reader.
pub struct BuildpackRequirement {
    name: String,
    repo: Rc<dyn BuildpackRepository>,
    fetched: RefCell<Option<Buildpack>>,
}

impl BuildpackRequirement {
    pub fn new(name: &str, repo: Rc<dyn BuildpackRepository>) -> Self {
        BuildpackRequirement { name: name.into(), repo, fetched: RefCell::new(None) }
    }

    /// The fetched record. `None` until `execute` has succeeded.
    pub fn buildpack(&self) -> Option<Buildpack> {
        self.fetched.borrow().clone()
    }
}

impl Requirement for BuildpackRequirement {
    fn execute(&self) -> Result<(), RequirementError> {
        let buildpack = self.repo.find_by_name(&self.name)?;
        *self.fetched.borrow_mut() = Some(buildpack);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    struct OneBuildpackRepo;

    impl BuildpackRepository for OneBuildpackRepo {
        fn list(&self) -> Result<Vec<Buildpack>, ApiError> {
            unreachable!()
        }

        fn find_by_name(&self, name: &str) -> Result<Buildpack, ApiError> {
            if name == "go-buildpack" {
                Ok(Buildpack { guid: "bp-1".into(), name: name.into(), ..Default::default() })
            } else {
                Err(ApiError::not_found("Buildpack", name))
            }
        }

        fn update(&self, _: &Buildpack) -> Result<Buildpack, ApiError> {
            unreachable!()
        }

        fn delete(&self, _: &str) -> Result<(), ApiError> {
            unreachable!()
        }
    }

    #[test]
    fn caches_the_fetched_buildpack() {
        let req = BuildpackRequirement::new("go-buildpack", Rc::new(OneBuildpackRepo));
        assert!(req.buildpack().is_none());
        req.execute().unwrap();
        assert_eq!(req.buildpack().unwrap().guid, "bp-1");
    }

    #[test]
    fn missing_buildpack_surfaces_not_found() {
        let req = BuildpackRequirement::new("nope", Rc::new(OneBuildpackRepo));
        let err = req.execute().unwrap_err();
        assert_eq!(err.to_string(), "Buildpack 'nope' not found");
        assert!(req.buildpack().is_none());
    }
}
