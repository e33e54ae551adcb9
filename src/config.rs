use std::{fs, path::Path};

use tracing::warn;
use wildstead_world::WorldConfig;

pub const DEFAULT_WORLD_CONFIG_PATH: &str = "config/world.toml";

/// Load world configuration from an explicit path, falling back to defaults on errors.
///
/// Only parsing happens here; validation is left to `WorldState::new` so a bad
/// value fails the run instead of being silently replaced.
pub fn load_world_config_from_path(path: &Path) -> WorldConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<WorldConfig>(&contents) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                WorldConfig::default()
            }
        },
        Err(err) => {
            if path != Path::new(DEFAULT_WORLD_CONFIG_PATH)
                || err.kind() != std::io::ErrorKind::NotFound
            {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else {
                warn!("World config not found at {}. Using defaults", path.display());
            }
            WorldConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("wildstead_{}_{name}", std::process::id()))
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let path = temp_path("partial.toml");
        fs::write(&path, "seed = 42.0\nrender_distance = 2\n").unwrap();
        let cfg = load_world_config_from_path(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(cfg.seed, Some(42.0));
        assert_eq!(cfg.render_distance, 2);
        assert_eq!(cfg.chunk_size, WorldConfig::default().chunk_size);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let path = temp_path("broken.toml");
        fs::write(&path, "render_distance = \"far\"").unwrap();
        let cfg = load_world_config_from_path(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(cfg, WorldConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_world_config_from_path(&temp_path("missing.toml"));
        assert_eq!(cfg, WorldConfig::default());
    }
}
