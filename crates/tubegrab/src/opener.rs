use std::env;
use std::process::Command;

use tubegrab_core::{TubeGrabError, TubeGrabResult};

pub const BROWSER_ENV: &str = "BROWSER";

pub fn open_link(url: &str) -> TubeGrabResult<()> {
    let browser = env::var(BROWSER_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    let (program, args) = launch_command(url, browser.as_deref());

    let status = Command::new(&program)
        .args(&args)
        .status()
        .map_err(|err| TubeGrabError::Config(format!("failed to open '{program}': {err}")))?;

    if !status.success() {
        return Err(TubeGrabError::Config(format!(
            "{program} exited with status: {status}"
        )));
    }

    Ok(())
}

fn launch_command(url: &str, browser: Option<&str>) -> (String, Vec<String>) {
    if let Some(browser) = browser {
        return (browser.trim().to_string(), vec![url.to_string()]);
    }

    if cfg!(target_os = "macos") {
        ("open".to_string(), vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        )
    } else {
        ("xdg-open".to_string(), vec![url.to_string()])
    }
}
