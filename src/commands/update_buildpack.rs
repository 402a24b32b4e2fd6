//! `update-buildpack`: mutate a buildpack's fields and/or upload new bits.
//!
//! Field changes are accumulated into one pending set before any remote call,
//! then applied as a single update request. A bits upload is an independent
//! second operation and always runs against the server's returned record, not
//! the locally mutated one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{Buildpack, BuildpackBitsRepository, BuildpackRepository};
use crate::command::{Command, CommandMetadata, FlagSpec, ParsedInvocation};
use crate::errors::CommandError;
use crate::requirements::{BuildpackRequirement, Requirement, RequirementsFactory};
use crate::terminal::Ui;

/// Field changes collected from flags before any remote call.
#[derive(Debug, Default, PartialEq, Eq)]
struct PendingChanges {
    position: Option<i64>,
    enabled: Option<bool>,
    locked: Option<bool>,
}

impl PendingChanges {
    fn any(&self) -> bool {
        self.position.is_some() || self.enabled.is_some() || self.locked.is_some()
    }

    fn apply(&self, buildpack: &mut Buildpack) {
        if self.position.is_some() {
            buildpack.position = self.position;
        }
        if self.enabled.is_some() {
            buildpack.enabled = self.enabled;
        }
        if self.locked.is_some() {
            buildpack.locked = self.locked;
        }
    }
}

pub struct UpdateBuildpack {
    buildpack_repo: Rc<dyn BuildpackRepository>,
    bits_repo: Rc<dyn BuildpackBitsRepository>,
    buildpack_req: RefCell<Option<Rc<BuildpackRequirement>>>,
}

impl UpdateBuildpack {
    pub fn new(
        buildpack_repo: Rc<dyn BuildpackRepository>,
        bits_repo: Rc<dyn BuildpackBitsRepository>,
    ) -> Self {
        UpdateBuildpack { buildpack_repo, bits_repo, buildpack_req: RefCell::new(None) }
    }

    /// Read flags into the pending change set, rejecting conflicting
    /// combinations before anything touches the network.
    fn collect_changes(
        &self,
        meta: &CommandMetadata,
        args: &ParsedInvocation,
    ) -> Result<(PendingChanges, Option<String>), CommandError> {
        let mut pending = PendingChanges::default();

        if args.is_set("i") {
            pending.position = args.int_flag("i");
        }

        let enable = args.bool_flag("enable");
        let disable = args.bool_flag("disable");
        if enable && disable {
            return Err(meta.usage_error("Cannot specify both --enable and --disable."));
        }
        // The flag is "disable" but the stored field is "enabled".
        if enable {
            pending.enabled = Some(true);
        }
        if disable {
            pending.enabled = Some(false);
        }

        let lock = args.bool_flag("lock");
        let unlock = args.bool_flag("unlock");
        if lock && unlock {
            return Err(meta.usage_error("Cannot specify both --lock and --unlock."));
        }

        let path = args.string_flag("p").map(str::to_owned);
        if path.is_some() && (lock || unlock) {
            return Err(meta.usage_error("Cannot specify buildpack bits and --lock/--unlock."));
        }

        if lock {
            pending.locked = Some(true);
        }
        if unlock {
            pending.locked = Some(false);
        }

        Ok((pending, path))
    }
}

impl Command for UpdateBuildpack {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "update-buildpack".into(),
            short_name: String::new(),
            description: "Update a buildpack".into(),
            usage: "{tool} update-buildpack BUILDPACK [-p PATH] [-i POSITION] \
                    [--enable|--disable] [--lock|--unlock]\n\nTIP:\n   \
                    Path should be a zip file, a url to a zip file, or a local directory. \
                    Position is a positive integer, sets priority, and is sorted from \
                    lowest to highest."
                .into(),
            flags: vec![
                FlagSpec::int("i", "Buildpack position among other buildpacks"),
                FlagSpec::string("p", "Path to directory or zip file"),
                FlagSpec::bool("enable", "Enable the buildpack"),
                FlagSpec::bool("disable", "Disable the buildpack"),
                FlagSpec::bool("lock", "Lock the buildpack"),
                FlagSpec::bool("unlock", "Unlock the buildpack"),
            ],
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
        let mut buildpack = requirement
            .buildpack()
            .ok_or_else(|| anyhow::anyhow!("buildpack requirement did not run"))?;

        ui.say(&format!("Updating buildpack {}...", buildpack.name));

        let meta = self.metadata();
        let (pending, path) = self.collect_changes(&meta, args)?;

        if pending.any() {
            pending.apply(&mut buildpack);
            // The server may normalize or reject fields; its returned record
            // is the source of truth from here on.
            buildpack = self.buildpack_repo.update(&buildpack).map_err(|e| {
                CommandError::remote(format!("Error updating buildpack {}", buildpack.name), e)
            })?;
        }

        if let Some(path) = path {
            self.bits_repo.upload(&buildpack, &path).map_err(|e| {
                CommandError::remote(format!("Error uploading buildpack {}", buildpack.name), e)
            })?;
        }

        ui.ok();
        Ok(())
    }
}
