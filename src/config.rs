pub use todo_sync_core::config::*;

use crate::cli::Cli;

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    AppConfig::discover(ConfigOverrides {
        api_url: cli.api_url.clone(),
        owner_id: cli.user_id,
        release_lock_on_delete_failure: cli.release_lock_on_delete_failure.then_some(true),
    })
}
