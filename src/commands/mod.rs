//! Built-in command implementations. Each command is in its own submodule.

pub mod buildpacks;
pub mod delete_buildpack;
pub mod install_plugin;
pub mod plugins;
pub mod uninstall_plugin;
pub mod update_buildpack;

pub use buildpacks::ListBuildpacks;
pub use delete_buildpack::DeleteBuildpack;
pub use install_plugin::InstallPlugin;
pub use plugins::ListPlugins;
pub use uninstall_plugin::UninstallPlugin;
pub use update_buildpack::UpdateBuildpack;
