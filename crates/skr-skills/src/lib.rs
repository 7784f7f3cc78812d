//! # skr-skills
//!
//! Discovery of installed Agent Skills. A skill is a directory containing a
//! `SKILL.md` file (Markdown with YAML frontmatter).
//!
//! ## Resolution
//!
//! Skills are searched for in an ordered list of roots:
//!
//! 1. The nearest `.agent/skills` directory above the working directory (local)
//! 2. Extra directories supplied by the caller, in the order given
//! 3. The global skills directory of each configured agent, in config order
//!
//! When several roots contain a skill with the same declared name, the first
//! root wins and the later copies are shadowed. A directory whose `SKILL.md`
//! fails to load is skipped without hiding its siblings.

pub mod definition;
pub mod resolver;
pub mod roots;
pub mod scanner;

pub use definition::SkillDefinition;
pub use resolver::{InstalledSkill, Resolution, Shadowed, list_installed, merge_roots};
pub use roots::{RootOrigin, SearchRoot, find_local_skills_dir, resolve_roots};
pub use scanner::{ScanReport, ScannedSkill, scan};
