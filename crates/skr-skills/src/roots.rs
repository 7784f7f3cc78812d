use serde::Serialize;
use skr_config::Config;
use skr_core::find_dir_upward;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a search root came from. Declaration order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootOrigin {
    /// The project's `.agent/skills` directory.
    Local,
    /// A directory supplied by the caller.
    Extra,
    /// A configured agent's global skills directory.
    Global,
}

impl RootOrigin {
    pub fn is_global(self) -> bool {
        self != RootOrigin::Local
    }
}

/// A directory scanned for skill subdirectories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub origin: RootOrigin,
    /// Position in the resolved root list, 0 = highest precedence.
    pub rank: usize,
}

/// Relative path of the project-local skills area.
pub fn local_marker() -> PathBuf {
    Path::new(".agent").join("skills")
}

/// Walk up from `start_dir` to the nearest `.agent/skills` directory.
pub fn find_local_skills_dir(start_dir: &Path) -> Option<PathBuf> {
    find_dir_upward(start_dir, &local_marker())
}

/// Compute the ordered search roots for `start_dir`.
///
/// Local (at most one) first, then `extra` in the given order without any
/// existence check, then one global root per known agent in `config.agents`.
/// Global roots are omitted when no home directory is available.
pub fn resolve_roots(
    start_dir: &Path,
    extra: &[PathBuf],
    config: &Config,
    home: Option<&Path>,
) -> Vec<SearchRoot> {
    let local = find_local_skills_dir(start_dir);
    if local.is_none() {
        debug!(?start_dir, "no .agent/skills directory found in hierarchy");
    }

    let globals = match home {
        Some(home) => config.agent_skill_dirs(home),
        None => {
            debug!("home directory unknown, skipping agent skill directories");
            Vec::new()
        }
    };

    let tiers = local
        .into_iter()
        .map(|p| (p, RootOrigin::Local))
        .chain(extra.iter().cloned().map(|p| (p, RootOrigin::Extra)))
        .chain(globals.into_iter().map(|p| (p, RootOrigin::Global)));

    tiers
        .enumerate()
        .map(|(rank, (path, origin))| SearchRoot { path, origin, rank })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_in_precedence_order() {
        let project = tempfile::tempdir().unwrap();
        let local = project.path().join(".agent").join("skills");
        std::fs::create_dir_all(&local).unwrap();
        let nested = project.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config {
            agents: vec!["roocode".into(), "unknown".into(), "standard".into()],
            skills: vec![],
        };
        let extra = vec![PathBuf::from("/extra/one"), PathBuf::from("/extra/two")];
        let roots = resolve_roots(&nested, &extra, &config, Some(Path::new("/home/u")));

        let summary: Vec<_> = roots.iter().map(|r| (r.path.clone(), r.origin, r.rank)).collect();
        assert_eq!(
            summary,
            vec![
                (local, RootOrigin::Local, 0),
                (PathBuf::from("/extra/one"), RootOrigin::Extra, 1),
                (PathBuf::from("/extra/two"), RootOrigin::Extra, 2),
                (PathBuf::from("/home/u/.roocode/skills"), RootOrigin::Global, 3),
                (PathBuf::from("/home/u/.config/agent/skills"), RootOrigin::Global, 4),
            ]
        );
    }

    #[test]
    fn no_local_root_and_no_home() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            agents: vec!["standard".into()],
            skills: vec![],
        };
        let roots = resolve_roots(dir.path(), &[PathBuf::from("/x")], &config, None);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].origin, RootOrigin::Extra);
        assert_eq!(roots[0].rank, 0);
    }

    #[test]
    fn origin_precedence_and_globality() {
        assert!(RootOrigin::Local < RootOrigin::Extra);
        assert!(RootOrigin::Extra < RootOrigin::Global);
        assert!(!RootOrigin::Local.is_global());
        assert!(RootOrigin::Extra.is_global());
        assert!(RootOrigin::Global.is_global());
    }
}
