//! Shared scaffolding embedded in every generated profile.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::profile::{
    KeyAction, Profile, Scaffold, SmartSelectionAction, SmartSelectionRule, Trigger,
};

/// Title component bit for the session name.
const TITLE_SESSION_NAME: u32 = 1;

/// Smart selection action that copies the match.
const SMART_SELECTION_COPY: u32 = 6;

/// Smart selection action that opens the match as a URL.
const SMART_SELECTION_OPEN_URL: u32 = 1;

/// Builds the static parts of a profile: rules, key bindings and triggers.
///
/// The passphrase trigger matches paths under the user's home directory,
/// so the template is tied to one home.
#[derive(Debug, Clone)]
pub struct ProfileTemplate {
    home: PathBuf,
}

impl ProfileTemplate {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// A fresh profile named `name` carrying the full scaffold.
    pub fn profile(&self, name: impl Into<String>) -> Profile {
        let name = name.into();
        let scaffold = self.scaffold(&name);
        Profile::new(name, scaffold, self.keyboard_map())
    }

    pub fn scaffold(&self, name: &str) -> Scaffold {
        Scaffold {
            unlimited_scrollback: true,
            title_components: TITLE_SESSION_NAME,
            custom_window_title: name.to_string(),
            allow_title_setting: false,
            smart_selection_rules: smart_selection_rules(),
            custom_directory: "Recycle".to_string(),
            flashing_bell: true,
            silence_bell: true,
            triggers: self.triggers(),
        }
    }

    /// Default key bindings: option+left/right move by word.
    pub fn keyboard_map(&self) -> BTreeMap<String, KeyAction> {
        BTreeMap::from([
            ("0xf702-0x280000".to_string(), KeyAction::escape_sequence("b")),
            ("0xf703-0x280000".to_string(), KeyAction::escape_sequence("f")),
        ])
    }

    pub fn triggers(&self) -> Vec<Trigger> {
        let id_rsa = self.home.join(".ssh").join("id_rsa");
        vec![
            // `git push` quotes the key path, `ssh-add` does not.
            Trigger {
                action: "PasswordTrigger".to_string(),
                parameter: "id_rsa".to_string(),
                regex: format!(
                    "Enter passphrase for (key ')?{}",
                    regex::escape(&id_rsa.to_string_lossy())
                ),
                partial: true,
            },
            Trigger {
                action: "HighlightTrigger".to_string(),
                parameter: "{#000000,#ffd700}".to_string(),
                regex: r"^Enter MFA code for arn:aws:iam::\d+:mfa/\S+:".to_string(),
                partial: true,
            },
        ]
    }
}

fn smart_selection_rules() -> Vec<SmartSelectionRule> {
    let copy = |title: &str| SmartSelectionAction {
        title: title.to_string(),
        action: SMART_SELECTION_COPY,
        parameter: "\\0".to_string(),
    };

    vec![
        SmartSelectionRule {
            notes: "AWS ARN".to_string(),
            precision: "very_high".to_string(),
            regex: r"arn:aws[a-z-]*:[a-z0-9-]+:[a-z0-9-]*:\d*:[A-Za-z0-9/_+=.@:-]+".to_string(),
            actions: vec![copy("Copy ARN")],
        },
        SmartSelectionRule {
            notes: "AWS access key id".to_string(),
            precision: "very_high".to_string(),
            regex: r"\b(AKIA|ASIA)[A-Z0-9]{16}\b".to_string(),
            actions: vec![copy("Copy access key id")],
        },
        SmartSelectionRule {
            notes: "HTTP URL".to_string(),
            precision: "very_high".to_string(),
            regex: r"https?://[^\s]+".to_string(),
            actions: vec![SmartSelectionAction {
                title: "Open URL".to_string(),
                action: SMART_SELECTION_OPEN_URL,
                parameter: "\\0".to_string(),
            }],
        },
        SmartSelectionRule {
            notes: "Absolute file path".to_string(),
            precision: "high".to_string(),
            regex: r"/[A-Za-z0-9_.\-/]+".to_string(),
            actions: vec![],
        },
    ]
}
