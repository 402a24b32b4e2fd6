//! `buildpacks`: list the buildpacks the platform knows about.

use std::rc::Rc;

use crate::api::BuildpackRepository;
use crate::command::{Command, CommandMetadata, ParsedInvocation};
use crate::errors::CommandError;
use crate::requirements::{Requirement, RequirementsFactory};
use crate::terminal::Ui;

pub struct ListBuildpacks {
    buildpack_repo: Rc<dyn BuildpackRepository>,
}

impl ListBuildpacks {
    pub fn new(buildpack_repo: Rc<dyn BuildpackRepository>) -> Self {
        ListBuildpacks { buildpack_repo }
    }
}

fn tri_state(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

impl Command for ListBuildpacks {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "buildpacks".into(),
            short_name: String::new(),
            description: "List all buildpacks".into(),
            usage: "{tool} buildpacks".into(),
            flags: vec![],
            skip_flag_parsing: false,
        }
    }

    fn get_requirements(
        &self,
        factory: &RequirementsFactory,
        args: &ParsedInvocation,
    ) -> Result<Vec<Rc<dyn Requirement>>, CommandError> {
        if !args.args().is_empty() {
            return Err(self.metadata().usage_error("No arguments expected"));
        }
        Ok(vec![factory.login()])
    }

    fn run(&self, ui: &mut dyn Ui, _args: &ParsedInvocation) -> Result<(), CommandError> {
        ui.say("Getting buildpacks...");

        let buildpacks = self
            .buildpack_repo
            .list()
            .map_err(|e| CommandError::remote("Error getting buildpacks", e))?;

        if buildpacks.is_empty() {
            ui.say("No buildpacks found");
            return Ok(());
        }

        ui.say("");
        ui.say(&format!("{:<30} {:>8}   {:<7} {:<7}", "buildpack", "position", "enabled", "locked"));
        for bp in &buildpacks {
            let position = bp.position.map(|p| p.to_string()).unwrap_or_default();
            ui.say(&format!(
                "{:<30} {:>8}   {:<7} {:<7}",
                bp.name,
                position,
                tri_state(bp.enabled),
                tri_state(bp.locked),
            ));
        }
        Ok(())
    }
}
