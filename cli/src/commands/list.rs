//! List command - show the profiles in the generated file.

use anyhow::Result;
use iterme_core::adapters::DynamicProfilesWriter;

use super::load_settings;

pub async fn run(name_filter: Option<String>, json: bool) -> Result<()> {
    let settings = load_settings().await?;
    let writer = DynamicProfilesWriter::with_path(settings.profiles_path());
    let mut profiles = writer.read().await?.profiles;

    // Apply filter
    if let Some(ref name) = name_filter {
        let name_lower = name.to_lowercase();
        profiles.retain(|profile| profile.name.to_lowercase().contains(&name_lower));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("No profiles found in {}.", writer.path().display());
        return Ok(());
    }

    // Table header
    println!("{:<40} {:<20} TAGS", "NAME", "OPTION+A");
    println!("{}", "-".repeat(80));

    for profile in &profiles {
        let name = truncate(&profile.name, 40);
        let shortcut = truncate(profile.login_shortcut().unwrap_or("-"), 20);
        let tags = profile.tags.join(", ");

        println!("{:<40} {:<20} {}", name, shortcut, tags);
    }

    println!("\nTotal: {} profiles", profiles.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max - 1).collect();
        format!("{}…", kept)
    }
}
