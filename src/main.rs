// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, build the REST helper from the
//   environment and hand it to the UI loop.

use anyhow::Context;
use antmedia_rest::{logging::init_logging, ui::main_menu, RestConfig, RestHelper};

fn main() -> anyhow::Result<()> {
    init_logging();

    // `ANTMEDIA_URL`, `ANTMEDIA_USER` and `ANTMEDIA_PASSWORD` override the
    // values of `~/.antmedia_rest.json`. See `RestConfig::from_env`.
    let config = RestConfig::from_env().context("Failed to load configuration")?;
    let rest = RestHelper::from_config(&config).context("Failed to build REST client")?;

    // Blocks until the user picks "Exit".
    main_menu(&rest)?;
    Ok(())
}
