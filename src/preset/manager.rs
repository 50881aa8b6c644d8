use super::{Preset, factory_presets};
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// User presets stored as one JSON file each, layered over the factory set.
pub struct Manager {
    presets_dir: PathBuf,
    presets: Vec<Preset>,
    factory: Vec<Preset>,
}

impl Manager {
    pub fn new(preset_dir: &str) -> Result<Self> {
        let presets_dir = Path::new(preset_dir).to_path_buf();
        fs::create_dir_all(&presets_dir).context("Failed to create presets directory")?;

        let mut manager = Self {
            presets_dir,
            presets: Vec::new(),
            factory: factory_presets(),
        };

        manager.load_presets()?;

        Ok(manager)
    }

    pub fn load_presets(&mut self) -> Result<()> {
        self.presets.clear();

        if !self.presets_dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.presets_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                match load_preset_file(&path) {
                    Ok(preset) => self.presets.push(preset),
                    Err(e) => {
                        warn!("Failed to load preset {}: {e:#}", path.display());
                    }
                }
            }
        }

        self.presets.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Loaded {} user preset(s) from {}",
            self.presets.len(),
            self.presets_dir.display()
        );

        Ok(())
    }

    pub fn save_preset(&mut self, preset: &Preset) -> Result<()> {
        let path = self.preset_path(&preset.name);

        let json = serde_json::to_string_pretty(preset).context("Failed to serialize preset")?;

        fs::write(&path, json).context("Failed to write preset file")?;
        debug!("Saved preset '{}' to {}", preset.name, path.display());

        self.load_presets()
    }

    pub fn delete_preset(&mut self, preset_name: &str) -> Result<()> {
        let path = self.preset_path(preset_name);

        if !path.exists() {
            bail!("Preset file not found: {preset_name}");
        }

        fs::remove_file(&path).context("Failed to delete preset file")?;
        debug!("Deleted preset '{preset_name}'");

        self.load_presets()
    }

    pub fn preset_exists(&self, name: &str) -> bool {
        self.get_preset_by_name(name).is_some()
    }

    /// User presets only.
    pub fn get_presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn factory_presets(&self) -> &[Preset] {
        &self.factory
    }

    /// Look a preset up by name. User presets shadow factory ones.
    pub fn get_preset_by_name(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .chain(&self.factory)
            .find(|p| p.name == name)
    }

    fn preset_path(&self, name: &str) -> PathBuf {
        self.presets_dir
            .join(format!("{}.json", sanitize_filename(name)))
    }
}

fn load_preset_file(path: &Path) -> Result<Preset> {
    let content = fs::read_to_string(path).context("Failed to read preset file")?;

    serde_json::from_str(&content).context("Failed to parse preset JSON")
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}
