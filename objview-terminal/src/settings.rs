//! View settings kept between sessions
//!
//! The render style (colors, sizes, vertex and edge style, projection) is
//! stored as JSON and restored at the next start.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use objview_core::RenderStyle;
use tracing::{debug, info};

const APP_DIR: &str = "objview";
const FILE_NAME: &str = "settings.json";

/// `$XDG_CONFIG_HOME/objview/settings.json`, falling back to `~/.config`
pub fn default_path() -> Option<PathBuf> {
    let config = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config.join(APP_DIR).join(FILE_NAME))
}

/// Read a saved style. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<RenderStyle>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved settings");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let style = serde_json::from_str(&text)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    debug!(path = %path.display(), "settings restored");
    Ok(Some(style))
}

pub fn save(path: &Path, style: &RenderStyle) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(style)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use objview_core::{Color, EdgeStyle, ProjectionMode, VertexStyle};

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("objview-settings-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_then_load_restores_style() {
        let path = scratch("restore.json");
        let style = RenderStyle {
            background: Color::rgb(10, 20, 30),
            edge_color: Color::rgb(0, 255, 0),
            vertex_size: 3.0,
            vertex_style: VertexStyle::Square,
            edge_style: EdgeStyle::Dotted,
            projection: ProjectionMode::Orthographic,
            ..RenderStyle::default()
        };

        save(&path, &style).unwrap();
        assert_eq!(load(&path).unwrap(), Some(style));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_none() {
        assert_eq!(load(&scratch("missing.json")).unwrap(), None);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let style: RenderStyle =
            serde_json::from_str(r#"{ "projection": "Orthographic" }"#).unwrap();
        assert_eq!(style.projection, ProjectionMode::Orthographic);
        assert_eq!(style.edge_color, RenderStyle::default().edge_color);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(load(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
