//! Alphabetical sorting of AWS config files.

use std::path::Path;

use tokio::fs;
use tracing::info;

use super::ini::IniDocument;
use crate::config::write_atomic;
use crate::error::Result;

/// Sort sections by header and entries by key.
///
/// Comments move with the section or entry they precede. Sorting an
/// already sorted config returns it unchanged.
pub fn sort_config(source: &str) -> Result<String> {
    let mut doc = IniDocument::parse(source)?;
    doc.sort();
    Ok(doc.to_string())
}

/// Sort the config file at `path` in place and return the sorted text.
///
/// With `dry_run` the file is left untouched.
pub async fn sort_file(path: &Path, dry_run: bool) -> Result<String> {
    let content = fs::read_to_string(path).await?;
    let sorted = sort_config(&content)?;

    if dry_run {
        return Ok(sorted);
    }

    if sorted != content {
        write_atomic(path, &sorted).await?;
        info!(path = %path.display(), "sorted AWS config");
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const UNSORTED: &str = "
        [profile b]
        region = eu-west-1
        [profile a]
        source_profile = c
        # assume role
        role_arn = arn:aws:iam::1:role/R
        [profile c]
    ";

    fn non_empty_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_sections_sorted() {
        let sorted = sort_config("[profile b]\n[profile a]\n[profile c]\n").unwrap();
        assert_eq!(
            non_empty_lines(&sorted),
            vec!["[profile a]", "[profile b]", "[profile c]"]
        );
    }

    #[test]
    fn test_entries_sorted_with_comments() {
        let sorted = sort_config(UNSORTED).unwrap();
        assert_eq!(
            non_empty_lines(&sorted),
            vec![
                "[profile a]",
                "# assume role",
                "role_arn = arn:aws:iam::1:role/R",
                "source_profile = c",
                "[profile b]",
                "region = eu-west-1",
                "[profile c]",
            ]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let once = sort_config(UNSORTED).unwrap();
        let twice = sort_config(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_settings_move_with_parent() {
        let sorted = sort_config(
            "[profile dev]\ns3 =\n  max_concurrent_requests = 20\n  max_queue_size = 1000\nregion = eu-west-1\napi_versions =\n  ec2 = 2015-03-01\n",
        )
        .unwrap();

        assert_eq!(
            sorted,
            "[profile dev]\n\
             api_versions =\n  ec2 = 2015-03-01\n\
             region = eu-west-1\n\
             s3 =\n  max_concurrent_requests = 20\n  max_queue_size = 1000\n"
        );
        assert_eq!(sort_config(&sorted).unwrap(), sorted);
    }

    #[tokio::test]
    async fn test_sort_file_keeps_nested_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(
            &path,
            "[profile b]\n[profile a]\ns3 =\n    addressing_style = path\nregion = x\n",
        )
        .unwrap();

        sort_file(&path, false).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[profile a]\nregion = x\ns3 =\n    addressing_style = path\n\n[profile b]\n"
        );
    }

    #[tokio::test]
    async fn test_sort_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "[profile b]\n[profile a]\n").unwrap();

        sort_file(&path, false).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[profile a]\n\n[profile b]\n");
    }

    #[tokio::test]
    async fn test_sort_file_dry_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "[profile b]\n[profile a]\n").unwrap();

        let sorted = sort_file(&path, true).await.unwrap();

        assert_eq!(sorted, "[profile a]\n\n[profile b]\n");
        let untouched = std::fs::read_to_string(&path).unwrap();
        assert_eq!(untouched, "[profile b]\n[profile a]\n");
    }
}
