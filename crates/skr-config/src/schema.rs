use serde::{Deserialize, Serialize};
use skr_core::overlay_first_wins;
use std::path::{Path, PathBuf};

/// File name written by [`Config::save`] and checked first during local discovery.
pub const LEGACY_CONFIG_NAME: &str = ".skr.yaml";

/// Standard file name, also used for the global document.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Root configuration, maps to `.skr.yaml` / `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agent identifiers whose global skill directories should be searched.
    /// Unique, in configuration order.
    pub agents: Vec<String>,
    /// Skill references. Order is kept and duplicates are allowed.
    pub skills: Vec<String>,
}

impl Config {
    /// Layer `overlay` on top of `self`.
    ///
    /// Skills are concatenated (`self` first). Agents keep `self`'s order and
    /// gain any overlay agent not already present. Merging the same pair twice
    /// duplicates the skills list, so each source must be merged exactly once.
    pub fn merge(self, overlay: Config) -> Config {
        let mut skills = self.skills;
        skills.extend(overlay.skills);

        let agents = overlay_first_wins([self.agents, overlay.agents], |a| a.clone());

        Config { agents, skills }
    }

    /// Agent identifiers with no entry in [`KNOWN_AGENTS`].
    pub fn unknown_agents(&self) -> Vec<&str> {
        self.agents
            .iter()
            .map(String::as_str)
            .filter(|a| !KNOWN_AGENTS.iter().any(|(known, _)| known == a))
            .collect()
    }

    /// Global skill directories for the configured agents, in `agents` order.
    /// Unknown agents are skipped.
    pub fn agent_skill_dirs(&self, home: &Path) -> Vec<PathBuf> {
        self.agents
            .iter()
            .filter_map(|agent| agent_skills_dir(agent, home))
            .collect()
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Persist as `<dir>/.skr.yaml`, returning the written path.
    pub fn save(&self, dir: &Path) -> skr_core::Result<PathBuf> {
        let path = dir.join(LEGACY_CONFIG_NAME);
        let data = self
            .to_yaml()
            .map_err(|e| anyhow::anyhow!("failed to serialize config: {e}"))?;
        std::fs::write(&path, data)?;
        Ok(path)
    }
}

// ── Known agents ───────────────────────────────────────────────

/// Agent identifier → global skills directory, as a function of the home directory.
pub const KNOWN_AGENTS: &[(&str, fn(&Path) -> PathBuf)] = &[
    ("standard", standard_skills_dir),
    ("antigravity", antigravity_skills_dir),
    ("roocode", roocode_skills_dir),
];

fn standard_skills_dir(home: &Path) -> PathBuf {
    home.join(".config").join("agent").join("skills")
}

fn antigravity_skills_dir(home: &Path) -> PathBuf {
    home.join(".antigravity").join("skills")
}

fn roocode_skills_dir(home: &Path) -> PathBuf {
    home.join(".roocode").join("skills")
}

/// Look up the global skills directory of a known agent.
pub fn agent_skills_dir(agent: &str, home: &Path) -> Option<PathBuf> {
    KNOWN_AGENTS
        .iter()
        .find(|(name, _)| *name == agent)
        .map(|(_, template)| template(home))
}
