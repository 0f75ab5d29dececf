use std::path::PathBuf;

const APP_DIR_NAME: &str = "water-tracker";

pub fn config_dir() -> Result<PathBuf, String> {
    Ok(platform_base()?.join(APP_DIR_NAME))
}

/// Data dir from `--data-dir`, falling back to the per-user app dir.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, String> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => Ok(platform_base()?.join(APP_DIR_NAME)),
    }
}

#[cfg(target_os = "macos")]
fn platform_base() -> Result<PathBuf, String> {
    Ok(home()?.join("Library").join("Application Support"))
}

#[cfg(not(target_os = "macos"))]
fn platform_base() -> Result<PathBuf, String> {
    match std::env::var_os("XDG_DATA_HOME").filter(|value| !value.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(home()?.join(".local").join("share")),
    }
}

fn home() -> Result<PathBuf, String> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|err| format!("resolve HOME: {}", err))
}
