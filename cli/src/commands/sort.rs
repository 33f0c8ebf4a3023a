//! Sort command - sort an AWS config file in place.

use std::path::PathBuf;

use anyhow::Result;
use iterme_core::aws::sort_file;

use super::load_settings;

pub async fn run(path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => load_settings().await?.aws_config_path(),
    };

    let sorted = sort_file(&path, dry_run).await?;

    if dry_run {
        print!("{}", sorted);
    } else {
        println!("Sorted {}", path.display());
    }
    Ok(())
}
