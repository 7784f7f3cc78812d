use std::path::Path;

use skr_skills::SkillDefinition;

pub(super) fn cmd_validate(path: &Path) -> skr_core::Result<()> {
    let skill = SkillDefinition::load(path)?;
    println!("Skill '{}' is valid.", skill.name);
    Ok(())
}
