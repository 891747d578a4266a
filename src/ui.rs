// UI layer: a simple interactive menu using `dialoguer`. Every entry maps
// to one `RestHelper` call; a failed call is printed and the menu goes on.

use crate::rest::RestHelper;
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

const MENU_ITEMS: [&str; 9] = [
    "Login",
    "Broadcast summary",
    "Find VoD",
    "Show app settings",
    "Update app settings",
    "Cluster nodes",
    "Install app",
    "Delete app",
    "Exit",
];

/// Main interactive menu. Runs a select loop over the REST operations
/// until the user chooses "Exit".
pub fn main_menu(rest: &RestHelper) -> Result<()> {
    println!("Server: {} (user: {})", rest.rest_url(), rest.user());
    loop {
        let selection = Select::new().items(&MENU_ITEMS[..]).default(0).interact()?;
        let outcome = match selection {
            0 => handle_login(rest),
            1 => handle_broadcasts(rest),
            2 => handle_find_vod(rest),
            3 => handle_show_settings(rest),
            4 => handle_update_settings(rest),
            5 => handle_cluster_nodes(rest),
            6 => handle_install(rest),
            7 => handle_delete(rest),
            _ => break,
        };
        if let Err(e) = outcome {
            println!("Request failed: {:#}", e);
        }
    }
    Ok(())
}

fn spinner(msg: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prompt_app_name() -> Result<String> {
    let name: String = Input::new()
        .with_prompt("Application name")
        .default("Conference".into())
        .interact_text()?;
    Ok(name)
}

fn handle_login(rest: &RestHelper) -> Result<()> {
    let pb = spinner("Logging in...")?;
    let res = rest.login();
    pb.finish_and_clear();
    res?;
    println!("Login request sent for {}", rest.user());
    Ok(())
}

fn handle_broadcasts(rest: &RestHelper) -> Result<()> {
    let pb = spinner("Fetching broadcasts...")?;
    let res = rest.get_broadcasts();
    pb.finish_and_clear();
    let summary = res?;
    println!("total publishers: {}", summary.publishers);
    println!("total players: {}", summary.players);
    Ok(())
}

fn handle_find_vod(rest: &RestHelper) -> Result<()> {
    let stream_id: String = Input::new().with_prompt("Stream id").interact_text()?;
    let pb = spinner("Searching VoDs...")?;
    let res = rest.get_vod_for(&stream_id);
    pb.finish_and_clear();
    match res? {
        Some(vod) => print_json(&vod),
        None => {
            println!("No VoD for {} among the latest 5 recordings", stream_id);
            Ok(())
        }
    }
}

fn handle_show_settings(rest: &RestHelper) -> Result<()> {
    let app = prompt_app_name()?;
    let pb = spinner("Fetching settings...")?;
    let res = rest.get_app_settings(&app);
    pb.finish_and_clear();
    print_json(&res?)
}

/// Read settings from a local JSON file and PUT them after confirmation.
fn handle_update_settings(rest: &RestHelper) -> Result<()> {
    let app = prompt_app_name()?;
    let path: String = Input::new().with_prompt("Settings JSON file").interact_text()?;
    let data = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
    let settings: Value =
        serde_json::from_str(&data).with_context(|| format!("{} is not valid JSON", path))?;

    let prompt = format!("Overwrite settings of {}?", app);
    if !Confirm::new().with_prompt(prompt).interact()? {
        return Ok(());
    }
    let pb = spinner("Updating settings...")?;
    let res = rest.put_app_settings(&app, &settings);
    pb.finish_and_clear();
    print_json(&res?)
}

fn handle_cluster_nodes(rest: &RestHelper) -> Result<()> {
    let pb = spinner("Fetching cluster nodes...")?;
    let res = rest.get_cluster_nodes();
    pb.finish_and_clear();
    match res? {
        Some(nodes) => print_json(&nodes),
        None => {
            println!("Cluster nodes are not available on this server");
            Ok(())
        }
    }
}

fn handle_install(rest: &RestHelper) -> Result<()> {
    let path: String = Input::new().with_prompt("War file path").interact_text()?;
    let app = prompt_app_name()?;
    let pb = spinner("Uploading...")?;
    let res = rest.install_app(&PathBuf::from(path), &app);
    pb.finish_and_clear();
    print_json(&res?)
}

fn handle_delete(rest: &RestHelper) -> Result<()> {
    let app = prompt_app_name()?;
    let prompt = format!("Delete application {}?", app);
    if !Confirm::new().with_prompt(prompt).default(false).interact()? {
        return Ok(());
    }
    let pb = spinner("Deleting...")?;
    let res = rest.delete_app(&app);
    pb.finish_and_clear();
    print_json(&res?)
}
