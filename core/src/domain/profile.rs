//! Derived terminal profile and its iTerm2 wire representation.
//!
//! Field names are the Dynamic Profiles keys iTerm2 binds to, so every
//! serde rename here is part of the output format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Keyboard map code for option+a, the shortcut that opens a login profile.
pub const LOGIN_SHORTCUT: &str = "0x61-0x80000";

/// Tag prefix recording the source profile a profile depends on.
pub const SOURCE_PROFILE_TAG_PREFIX: &str = "source_profile_";

// ============================================================================
// Appearance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    #[serde(rename = "sRGB")]
    Srgb,
}

/// An RGBA color in iTerm2's component format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "Red Component")]
    pub red: f64,
    #[serde(rename = "Green Component")]
    pub green: f64,
    #[serde(rename = "Blue Component")]
    pub blue: f64,
    #[serde(rename = "Alpha Component")]
    pub alpha: f64,
    #[serde(rename = "Color Space", default)]
    pub color_space: ColorSpace,
}

impl Color {
    /// Background for production AWS profiles.
    pub const PRODUCTION: Color = Color::rgb(0.217, 0.0, 0.0);

    /// Background for Kubernetes profiles.
    pub const KUBERNETES: Color = Color::rgb(0.0, 0.129, 0.282);

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
            color_space: ColorSpace::Srgb,
        }
    }
}

// ============================================================================
// Keyboard map
// ============================================================================

/// A keyboard map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAction {
    #[serde(rename = "Action")]
    pub action: u32,
    #[serde(rename = "Text")]
    pub text: String,
}

impl KeyAction {
    pub const SEND_ESCAPE_SEQUENCE: u32 = 10;
    pub const SPLIT_HORIZONTALLY_WITH_PROFILE: u32 = 28;

    /// Send `ESC <text>`.
    pub fn escape_sequence(text: impl Into<String>) -> Self {
        Self {
            action: Self::SEND_ESCAPE_SEQUENCE,
            text: text.into(),
        }
    }

    /// Open a horizontal split running the profile with the given guid.
    pub fn split_with_profile(guid: impl Into<String>) -> Self {
        Self {
            action: Self::SPLIT_HORIZONTALLY_WITH_PROFILE,
            text: guid.into(),
        }
    }
}

// ============================================================================
// Scaffold
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub action: String,
    pub parameter: String,
    pub regex: String,
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartSelectionAction {
    pub title: String,
    pub action: u32,
    pub parameter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartSelectionRule {
    pub notes: String,
    pub precision: String,
    pub regex: String,
    #[serde(default)]
    pub actions: Vec<SmartSelectionAction>,
}

/// Settings shared by every generated profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scaffold {
    #[serde(rename = "Unlimited Scrollback")]
    pub unlimited_scrollback: bool,
    #[serde(rename = "Title Components")]
    pub title_components: u32,
    #[serde(rename = "Custom Window Title")]
    pub custom_window_title: String,
    #[serde(rename = "Allow Title Setting")]
    pub allow_title_setting: bool,
    #[serde(rename = "Smart Selection Rules")]
    pub smart_selection_rules: Vec<SmartSelectionRule>,
    #[serde(rename = "Custom Directory")]
    pub custom_directory: String,
    #[serde(rename = "Flashing Bell")]
    pub flashing_bell: bool,
    #[serde(rename = "Silence Bell")]
    pub silence_bell: bool,
    #[serde(rename = "Triggers")]
    pub triggers: Vec<Trigger>,
}

// ============================================================================
// Profile
// ============================================================================

/// Whether iTerm2 runs `Command` instead of the login shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CustomCommand {
    #[default]
    Yes,
    No,
}

/// A generated terminal profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Guid")]
    pub guid: String,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
    #[serde(rename = "Command")]
    pub command: String,
    #[serde(rename = "Custom Command")]
    pub custom_command: CustomCommand,
    #[serde(rename = "Keyboard Map")]
    pub keyboard_map: BTreeMap<String, KeyAction>,
    #[serde(rename = "Background Color", skip_serializing_if = "Option::is_none", default)]
    pub background_color: Option<Color>,
    #[serde(rename = "Initial Text", skip_serializing_if = "Option::is_none", default)]
    pub initial_text: Option<String>,
    #[serde(rename = "Badge Text", skip_serializing_if = "Option::is_none", default)]
    pub badge_text: Option<String>,
    #[serde(flatten)]
    pub scaffold: Scaffold,
}

impl Profile {
    /// Create a profile whose guid is its name, with the given scaffold and key map.
    pub fn new(
        name: impl Into<String>,
        scaffold: Scaffold,
        keyboard_map: BTreeMap<String, KeyAction>,
    ) -> Self {
        let name = name.into();
        Self {
            guid: name.clone(),
            name,
            tags: Vec::new(),
            command: String::new(),
            custom_command: CustomCommand::Yes,
            keyboard_map,
            background_color: None,
            initial_text: None,
            badge_text: None,
            scaffold,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Append tags, skipping absent and empty values.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<String>,
    {
        for tag in tags.into_iter().flatten() {
            self.push_tag(tag);
        }
        self
    }

    /// Append a tag unless it is empty.
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() {
            self.tags.push(tag);
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Record the dependency on `source_profile` and bind option+a to its login profile.
    pub fn link_source_profile(&mut self, source_profile: &str) {
        self.push_tag(format!("{}{}", SOURCE_PROFILE_TAG_PREFIX, source_profile));
        self.bind_login_shortcut(source_profile);
    }

    /// Bind option+a to `login-<source_profile>`.
    pub fn bind_login_shortcut(&mut self, source_profile: &str) {
        self.keyboard_map.insert(
            LOGIN_SHORTCUT.to_string(),
            KeyAction::split_with_profile(login_profile_name(source_profile)),
        );
    }

    /// The login profile option+a opens, if bound.
    pub fn login_shortcut(&self) -> Option<&str> {
        self.keyboard_map
            .get(LOGIN_SHORTCUT)
            .map(|action| action.text.as_str())
    }
}

/// Name of the synthetic login profile for a source profile.
pub fn login_profile_name(source_profile: &str) -> String {
    format!("login-{}", source_profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaffold() -> Scaffold {
        Scaffold {
            unlimited_scrollback: true,
            title_components: 1,
            custom_window_title: "p".to_string(),
            allow_title_setting: false,
            smart_selection_rules: vec![],
            custom_directory: "Recycle".to_string(),
            flashing_bell: true,
            silence_bell: true,
            triggers: vec![],
        }
    }

    #[test]
    fn test_with_tags_drops_empty() {
        let profile = Profile::new("p", scaffold(), BTreeMap::new()).with_tags([
            Some("123".to_string()),
            None,
            Some(String::new()),
            Some("Admin".to_string()),
        ]);
        assert_eq!(profile.tags, vec!["123", "Admin"]);
        assert_eq!(profile.guid, "p");
    }

    #[test]
    fn test_link_source_profile() {
        let mut profile = Profile::new("dev", scaffold(), BTreeMap::new());
        profile.link_source_profile("base");

        assert!(profile.has_tag("source_profile_base"));
        assert_eq!(profile.login_shortcut(), Some("login-base"));
    }

    #[test]
    fn test_wire_field_names() {
        let mut profile = Profile::new("prod", scaffold(), BTreeMap::new()).with_command("zsh");
        profile.background_color = Some(Color::PRODUCTION);
        profile.bind_login_shortcut("base");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["Name"], "prod");
        assert_eq!(json["Guid"], "prod");
        assert_eq!(json["Command"], "zsh");
        assert_eq!(json["Custom Command"], "Yes");
        assert_eq!(json["Keyboard Map"][LOGIN_SHORTCUT]["Text"], "login-base");
        assert_eq!(json["Keyboard Map"][LOGIN_SHORTCUT]["Action"], 28);
        assert_eq!(json["Background Color"]["Red Component"], 0.217);
        assert_eq!(json["Background Color"]["Color Space"], "sRGB");
        assert_eq!(json["Unlimited Scrollback"], true);
        assert_eq!(json["Custom Directory"], "Recycle");
        assert!(json.get("Initial Text").is_none());
        assert!(json.get("Badge Text").is_none());

        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
