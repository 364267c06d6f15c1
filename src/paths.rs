use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("confmenu"))
}

/// Conventional plugin root: a `plugins.d` directory under the config dir.
pub fn plugins_dir() -> Result<PathBuf> {
    config_dir().map(|p| p.join("plugins.d"))
}

pub fn ensure_plugins_dir() -> Result<PathBuf> {
    let dir = plugins_dir()?;
    if dir.exists() {
        return Ok(dir);
    }

    fs::create_dir_all(&dir).context("Failed to create plugins directory")?;
    log::info!("Created plugins directory: {:?}", dir);
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_have_correct_suffixes() {
        let cases: Vec<(Result<PathBuf>, &str)> = vec![
            (config_dir(), "confmenu"),
            (plugins_dir(), "confmenu/plugins.d"),
        ];

        for (result, expected_suffix) in cases {
            let path = result.unwrap();
            assert!(
                path.ends_with(expected_suffix),
                "path {:?} should end with {}",
                path,
                expected_suffix
            );
        }
    }
}
