//! `zyxctl login`: check credentials without fetching any page.

use owo_colors::OwoColorize;
use zyxctl_core::Router;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    router.login().await?;

    let url = router.config().url.as_str();
    let msg = if output::should_color(&global.color) {
        format!("{} Logged in to {url}", "✓".green())
    } else {
        format!("✓ Logged in to {url}")
    };
    output::print_output(&msg, global.quiet);
    Ok(())
}
