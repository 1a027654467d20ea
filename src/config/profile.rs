// src/config/profile.rs
use serde::{Serialize, Deserialize};

pub const GENERIC_AVATAR_URL: &str =
    "https://ui-avatars.com/api/?name=Usuario&background=0D8ABC&color=fff";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: String,
    pub phone: String,
    pub company: Option<String>,
    pub cnpj: Option<String>,
    pub segment: Option<String>,
    pub team_size: Option<String>,
    pub website: Option<String>,
}

impl User {
    /// The single implicit identity; there is no authentication.
    pub fn local() -> Self {
        Self {
            uid: "local-user".to_string(),
            name: Some("Usuário".to_string()),
            email: Some("usuario@local.com".to_string()),
            avatar_url: GENERIC_AVATAR_URL.to_string(),
            phone: String::new(),
            company: None,
            cnpj: None,
            segment: None,
            team_size: None,
            website: None,
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(avatar_url) = patch.avatar_url {
            self.avatar_url = avatar_url;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(company) = patch.company {
            self.company = Some(company);
        }
        if let Some(cnpj) = patch.cnpj {
            self.cnpj = Some(cnpj);
        }
        if let Some(segment) = patch.segment {
            self.segment = Some(segment);
        }
        if let Some(team_size) = patch.team_size {
            self.team_size = Some(team_size);
        }
        if let Some(website) = patch.website {
            self.website = Some(website);
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::local()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub cnpj: Option<String>,
    pub segment: Option<String>,
    pub team_size: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    pub reduced_animations: bool,
    pub compact_sidebar: bool,
    pub auto_gain_control: bool,
    pub noise_suppression: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            reduced_animations: false,
            compact_sidebar: false,
            auto_gain_control: true,
            noise_suppression: false,
        }
    }
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(v) = patch.reduced_animations {
            self.reduced_animations = v;
        }
        if let Some(v) = patch.compact_sidebar {
            self.compact_sidebar = v;
        }
        if let Some(v) = patch.auto_gain_control {
            self.auto_gain_control = v;
        }
        if let Some(v) = patch.noise_suppression {
            self.noise_suppression = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub reduced_animations: Option<bool>,
    pub compact_sidebar: Option<bool>,
    pub auto_gain_control: Option<bool>,
    pub noise_suppression: Option<bool>,
}
