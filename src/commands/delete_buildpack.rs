//! `delete-buildpack`: remove a buildpack, with confirmation unless forced.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::BuildpackRepository;
use crate::command::{Command, CommandMetadata, FlagSpec, ParsedInvocation};
use crate::errors::CommandError;
use crate::requirements::{BuildpackRequirement, Requirement, RequirementsFactory};
use crate::terminal::Ui;

pub struct DeleteBuildpack {
    buildpack_repo: Rc<dyn BuildpackRepository>,
    buildpack_req: RefCell<Option<Rc<BuildpackRequirement>>>,
}

impl DeleteBuildpack {
    pub fn new(buildpack_repo: Rc<dyn BuildpackRepository>) -> Self {
        DeleteBuildpack { buildpack_repo, buildpack_req: RefCell::new(None) }
    }
}

impl Command for DeleteBuildpack {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "delete-buildpack".into(),
            short_name: String::new(),
            description: "Delete a buildpack".into(),
            usage: "{tool} delete-buildpack BUILDPACK [-f]".into(),
            flags: vec![FlagSpec::bool("f", "Force deletion without confirmation")],
            skip_flag_parsing: false,
        }
    }

    fn get_requirements(
        &self,
        factory: &RequirementsFactory,
        args: &ParsedInvocation,
    ) -> Result<Vec<Rc<dyn Requirement>>, CommandError> {
        if args.args().len() != 1 {
            return Err(self.metadata().usage_error("Requires a buildpack name as argument"));
        }

        let buildpack_req = factory.buildpack(&args.args()[0]);
        *self.buildpack_req.borrow_mut() = Some(buildpack_req.clone());

        let fetch: Rc<dyn Requirement> = buildpack_req;
        Ok(vec![factory.login(), fetch])
    }

    fn run(&self, ui: &mut dyn Ui, args: &ParsedInvocation) -> Result<(), CommandError> {
        let requirement = self
            .buildpack_req
            .borrow()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("buildpack requirement missing"))?;
        let buildpack = requirement
            .buildpack()
            .ok_or_else(|| anyhow::anyhow!("buildpack requirement did not run"))?;

        if !args.bool_flag("f") {
            let confirmed =
                ui.confirm(&format!("Really delete the buildpack {}?", buildpack.name));
            if !confirmed {
                ui.say(&format!("Delete cancelled for buildpack {}", buildpack.name));
                return Ok(());
            }
        }

        ui.say(&format!("Deleting buildpack {}...", buildpack.name));

        self.buildpack_repo.delete(&buildpack.guid).map_err(|e| {
            CommandError::remote(format!("Error deleting buildpack {}", buildpack.name), e)
        })?;

        ui.ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::api::{ApiError, Buildpack};
    use crate::config::CoreConfig;
    use crate::terminal::BufferUi;

    #[derive(Default)]
    struct DeleteRepo {
        deleted: RefCell<Vec<String>>,
    }

    impl BuildpackRepository for DeleteRepo {
        fn list(&self) -> Result<Vec<Buildpack>, ApiError> {
            unreachable!()
        }
        fn find_by_name(&self, name: &str) -> Result<Buildpack, ApiError> {
            Ok(Buildpack { guid: format!("guid-{}", name), name: name.into(), ..Default::default() })
        }
        fn update(&self, _: &Buildpack) -> Result<Buildpack, ApiError> {
            unreachable!()
        }
        fn delete(&self, guid: &str) -> Result<(), ApiError> {
            self.deleted.borrow_mut().push(guid.into());
            Ok(())
        }
    }

    fn run(repo: Rc<DeleteRepo>, raw: &[&str]) -> (String, Result<(), crate::errors::RunError>) {
        let config = Rc::new(CoreConfig { access_token: Some("tok".into()), ..Default::default() });
        let factory = RequirementsFactory::new(config, repo.clone());
        let mut registry = crate::runner::Registry::new();
        registry.register(Box::new(DeleteBuildpack::new(repo))).unwrap();
        let runner = crate::runner::Runner::new(registry, factory);

        let argv: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        let mut ui = BufferUi::new();
        let result = runner.run_by_name(&argv, &mut ui);
        (ui.into_output(), result)
    }

    #[test]
    fn forced_delete_skips_confirmation() {
        let repo = Rc::new(DeleteRepo::default());
        let (output, result) = run(repo.clone(), &["delete-buildpack", "go-buildpack", "-f"]);
        result.unwrap();
        assert_eq!(*repo.deleted.borrow(), ["guid-go-buildpack"]);
        assert!(output.contains("Deleting buildpack go-buildpack..."));
    }

    #[test]
    fn declined_confirmation_deletes_nothing() {
        // BufferUi answers no to every confirmation.
        let repo = Rc::new(DeleteRepo::default());
        let (output, result) = run(repo.clone(), &["delete-buildpack", "go-buildpack"]);
        result.unwrap();
        assert!(repo.deleted.borrow().is_empty());
        assert!(output.contains("Delete cancelled"));
    }
}
