use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// RGBDS constants files, relative to the project path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConstantsFiles {
    /// Hardware register names; the first file that exists is used.
    pub hardware: Vec<PathBuf>,
    pub vram: PathBuf,
    pub hram: PathBuf,
}

impl Default for ConstantsFiles {
    fn default() -> Self {
        Self {
            hardware: vec![
                PathBuf::from("gbhw.asm"),
                PathBuf::from("constants/hardware_constants.asm"),
            ],
            vram: PathBuf::from("vram.asm"),
            hram: PathBuf::from("hram.asm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory for every relative path below.
    pub path: Option<PathBuf>,
    pub rom: PathBuf,
    pub output: PathBuf,
    pub indent: String,
    pub constants: ConstantsFiles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            rom: PathBuf::from("baserom.gbc"),
            output: PathBuf::from("gbz80disasm_output.asm"),
            indent: "\t".to_string(),
            constants: ConstantsFiles::default(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("gbdis").join("config.toml");
        }
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("gbdis").join("config.toml");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("gbdis")
            .join("config.toml");
    }

    PathBuf::from("gbdis.toml")
}

pub fn load_from_file(path: &Path) -> Config {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return Config::default(),
    };

    match toml::from_str::<Config>(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(
                "Failed to parse config {}: {e}; using defaults",
                path.display()
            );
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_from_file(&dir.path().join("config.toml"));
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.rom, PathBuf::from("baserom.gbc"));
        assert_eq!(cfg.indent, "\t");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "path = \"/src/pokecrystal\"\nrom = \"pokecrystal.gbc\"\n\n[constants]\nhram = \"constants/hram.asm\"\n",
        )
        .unwrap();

        let cfg = load_from_file(&path);
        assert_eq!(cfg.path, Some(PathBuf::from("/src/pokecrystal")));
        assert_eq!(cfg.rom, PathBuf::from("pokecrystal.gbc"));
        assert_eq!(cfg.output, PathBuf::from("gbz80disasm_output.asm"));
        assert_eq!(cfg.constants.hram, PathBuf::from("constants/hram.asm"));
        assert_eq!(cfg.constants.vram, PathBuf::from("vram.asm"));
        assert_eq!(cfg.constants.hardware.len(), 2);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rom = [not toml").unwrap();
        assert_eq!(load_from_file(&path), Config::default());
    }

    #[test]
    fn default_path_ends_in_config_toml() {
        let path = default_config_path();
        assert!(path.ends_with("config.toml") || path.ends_with("gbdis.toml"));
    }
}
