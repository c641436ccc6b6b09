use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_PREVIEW_PERCENT: u16 = 50;
const PREVIEW_PERCENT_RANGE: std::ops::RangeInclusive<u16> = 10..=90;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub safe_html: bool,
    pub no_mouse: bool,
    pub preview_percent: Option<u16>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: booleans OR together, `other` wins for
    /// valued options it sets.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            safe_html: self.safe_html || other.safe_html,
            no_mouse: self.no_mouse || other.no_mouse,
            preview_percent: other.preview_percent.or(self.preview_percent),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    /// Preview width share in percent, clamped to 10..=90.
    pub fn effective_preview_percent(&self) -> u16 {
        self.preview_percent
            .unwrap_or(DEFAULT_PREVIEW_PERCENT)
            .clamp(*PREVIEW_PERCENT_RANGE.start(), *PREVIEW_PERCENT_RANGE.end())
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpad")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpadrc")
}

/// Read flag tokens from a config file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as the defaults in `path`, creating its directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# markpad defaults (saved with --save)".to_string()];
    if flags.safe_html {
        lines.push("--safe-html".to_string());
    }
    if flags.no_mouse {
        lines.push("--no-mouse".to_string());
    }
    if let Some(percent) = flags.preview_percent {
        lines.push(format!("--preview-percent {percent}"));
    }
    if let Some(log) = &flags.log_file {
        lines.push(format!("--log-file {}", log.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
///
/// Returns an error if the file exists and cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of `tokens`; anything else is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--safe-html" => flags.safe_html = true,
            "--no-mouse" => flags.no_mouse = true,
            "--preview-percent" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.preview_percent = parse_percent(next);
                    i += 1;
                }
            }
            "--log-file" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.log_file = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--preview-percent=") {
                    flags.preview_percent = parse_percent(value);
                } else if let Some(value) = token.strip_prefix("--log-file=") {
                    flags.log_file = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

fn parse_percent(value: &str) -> Option<u16> {
    let percent = value.trim_end_matches('%').parse::<u16>().ok()?;
    Some(percent.clamp(*PREVIEW_PERCENT_RANGE.start(), *PREVIEW_PERCENT_RANGE.end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "markpad",
            "--safe-html",
            "--no-mouse",
            "--preview-percent",
            "40",
            "--log-file=markpad.log",
            "README.md",
        ]));
        assert!(flags.safe_html);
        assert!(flags.no_mouse);
        assert_eq!(flags.preview_percent, Some(40));
        assert_eq!(flags.log_file, Some(PathBuf::from("markpad.log")));
    }

    #[test]
    fn test_preview_percent_is_clamped_and_validated() {
        let flags = parse_flag_tokens(&tokens(&["--preview-percent=95"]));
        assert_eq!(flags.preview_percent, Some(90));
        let flags = parse_flag_tokens(&tokens(&["--preview-percent", "5%"]));
        assert_eq!(flags.preview_percent, Some(10));
        let flags = parse_flag_tokens(&tokens(&["--preview-percent", "wide"]));
        assert_eq!(flags.preview_percent, None);
        assert_eq!(flags.effective_preview_percent(), DEFAULT_PREVIEW_PERCENT);
    }

    #[test]
    fn test_trailing_valued_flag_without_value_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--log-file"]));
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_config_union_prefers_later_values() {
        let file = ConfigFlags {
            safe_html: true,
            preview_percent: Some(30),
            log_file: Some(PathBuf::from("file.log")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_mouse: true,
            preview_percent: Some(70),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.safe_html);
        assert!(merged.no_mouse);
        assert_eq!(merged.preview_percent, Some(70));
        assert_eq!(merged.log_file, Some(PathBuf::from("file.log")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            safe_html: true,
            no_mouse: true,
            preview_percent: Some(60),
            log_file: Some(PathBuf::from("markpad.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
