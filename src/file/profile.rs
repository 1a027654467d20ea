// src/file/profile.rs
use super::FileHandler;
use crate::config::{Settings, User};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

/// Local identity and UI preferences, persisted as `profile.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub user: User,
    pub settings: Settings,
}

#[derive(Debug, Default)]
pub struct ProfileFileHandler;

impl ProfileFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<Profile> for ProfileFileHandler {
    fn load(&self, path: &Path) -> Result<Profile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
        ron::from_str(&content).context("Failed to parse profile file")
    }

    fn save(&self, data: &Profile, path: &Path) -> Result<()> {
        let content = ron::ser::to_string_pretty(
            data,
            ron::ser::PrettyConfig::new()
                .new_line("\n".to_string())
                .depth_limit(4)
                .separate_tuple_members(true)
        )?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    #[test]
    fn profile_survives_a_save_load_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.ron");
        let handler = ProfileFileHandler::new();

        let mut profile = Profile::default();
        profile.user.company = Some("Acme Vendas".into());
        profile.settings.theme = Theme::Light;
        handler.save(&profile, &path).unwrap();

        assert_eq!(handler.load(&path).unwrap(), profile);
    }

    #[test]
    fn partial_profile_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.ron");
        fs::write(&path, "(settings: (theme: light, reduced_animations: true, compact_sidebar: false, auto_gain_control: true, noise_suppression: false))").unwrap();

        let profile = ProfileFileHandler::new().load(&path).unwrap();
        assert_eq!(profile.user, User::local());
        assert_eq!(profile.settings.theme, Theme::Light);
        assert!(profile.settings.reduced_animations);
    }
}
