use serde::{Deserialize, Deserializer, Serialize};
use skr_core::SkrError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the descriptor file inside a skill directory.
pub const SKILL_FILE: &str = "SKILL.md";

const MAX_NAME_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 1024;

/// A skill definition parsed from a SKILL.md file.
///
/// The frontmatter carries the declared identity of the skill; the body is
/// free-form Markdown and is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Declared skill name. This, not the directory name, identifies the skill.
    #[serde(default)]
    pub name: String,
    /// Short description of what the skill does.
    #[serde(default)]
    pub description: String,
    /// Declared version. Numeric YAML scalars (`version: 1.0`) are accepted.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    /// Space separated tool allow-list, passed through untouched.
    #[serde(default, rename = "allowed-tools")]
    pub allowed_tools: Option<String>,
    /// Arbitrary string metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// The Markdown body after the frontmatter.
    #[serde(skip)]
    pub body: String,
    /// Absolute path to the SKILL.md file.
    #[serde(skip)]
    pub file_path: PathBuf,
    /// Base directory of the skill (parent of SKILL.md).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl SkillDefinition {
    /// Load a skill from its directory (or from the SKILL.md path itself).
    ///
    /// Fails with [`SkrError::InvalidSkill`] when the descriptor is missing,
    /// unreadable, malformed, or does not pass validation.
    pub fn load(path: &Path) -> skr_core::Result<Self> {
        let (base_dir, file_path) = if path.is_file() {
            let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            (base, path.to_path_buf())
        } else {
            (path.to_path_buf(), path.join(SKILL_FILE))
        };

        let content = std::fs::read_to_string(&file_path).map_err(|e| SkrError::InvalidSkill {
            path: base_dir.clone(),
            reason: format!("cannot read {SKILL_FILE}: {e}"),
        })?;

        Self::parse(&content, file_path, base_dir)
    }

    /// Parse SKILL.md content with known path info.
    pub fn parse(content: &str, file_path: PathBuf, base_dir: PathBuf) -> skr_core::Result<Self> {
        let invalid = |reason: String| SkrError::InvalidSkill {
            path: base_dir.clone(),
            reason,
        };

        let (frontmatter, body) = split_frontmatter(content).map_err(invalid)?;

        if frontmatter.trim().is_empty() {
            return Err(invalid("frontmatter is empty".into()));
        }
        let mut def: SkillDefinition = serde_yaml::from_str(&frontmatter)
            .map_err(|e| invalid(format!("invalid frontmatter: {e}")))?;

        validate_name(&def.name).map_err(invalid)?;
        if def.description.trim().is_empty() {
            return Err(invalid(format!("skill '{}' has no description", def.name)));
        }
        if def.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(invalid(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        def.body = body;
        def.file_path = file_path;
        def.base_dir = base_dir;
        Ok(def)
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Split a SKILL.md file into YAML frontmatter and Markdown body.
fn split_frontmatter(content: &str) -> Result<(String, String), String> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    let Some(after_first) = trimmed.strip_prefix("---") else {
        return Err(format!("{SKILL_FILE} must start with YAML frontmatter (---)"));
    };

    let end_pos = after_first
        .find("\n---")
        .ok_or_else(|| format!("{SKILL_FILE}: missing closing --- for frontmatter"))?;

    let frontmatter = after_first[..end_pos].to_string();
    let rest = &after_first[end_pos + 4..];
    // Drop the remainder of the closing delimiter line.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");

    Ok((frontmatter, body.trim().to_string()))
}

/// Lowercase ASCII letters, digits and single hyphens, at most 64 characters.
fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("skill name is empty".into());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("skill name exceeds {MAX_NAME_LEN} characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(format!(
            "skill name '{name}' may only contain lowercase letters, digits and hyphens"
        ));
    }
    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return Err(format!(
            "skill name '{name}' must not start or end with a hyphen or contain '--'"
        ));
    }
    Ok(())
}
