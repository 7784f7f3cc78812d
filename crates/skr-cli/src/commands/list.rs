use console::style;
use std::path::{Component, Path, PathBuf};

use skr_config::ConfigLoader;
use skr_skills::{InstalledSkill, Resolution};

const COLUMN_GAP: usize = 3;

pub(super) fn cmd_list(
    loader: &ConfigLoader,
    extra: &[PathBuf],
    json: bool,
) -> skr_core::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = loader.load_merged(&cwd)?;
    let home = dirs::home_dir();

    let extra = absolute_roots(&cwd, extra);
    let resolution = skr_skills::list_installed(&cwd, &extra, &config, home.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution.skills)?);
        return Ok(());
    }

    match empty_message(&resolution, &cwd) {
        Some(msg) => println!("{msg}"),
        None => {
            let table = render_table(&resolution.skills, &cwd);
            let mut lines = table.lines();
            if let Some(header) = lines.next() {
                println!("{}", style(header).bold());
            }
            for line in lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Anchor relative `--extra` directories at `cwd`.
fn absolute_roots(cwd: &Path, extra: &[PathBuf]) -> Vec<PathBuf> {
    extra
        .iter()
        .map(|p| if p.is_absolute() { p.clone() } else { cwd.join(p) })
        .collect()
}

fn empty_message(resolution: &Resolution, cwd: &Path) -> Option<String> {
    if !resolution.skills.is_empty() {
        return None;
    }
    if resolution.has_local_root {
        Some("No skills installed in this context.".to_string())
    } else {
        Some(format!(
            "No agent context found (searching up from {}).",
            cwd.display()
        ))
    }
}

/// Render `NAME VERSION GLOBAL PATH` aligned columns, header first.
fn render_table(skills: &[InstalledSkill], cwd: &Path) -> String {
    let header = ["NAME", "VERSION", "GLOBAL", "PATH"].map(String::from);
    let rows: Vec<[String; 4]> = std::iter::once(header)
        .chain(skills.iter().map(|s| {
            [
                s.name.clone(),
                s.version.clone(),
                if s.is_global { "*".into() } else { String::new() },
                relative_to(&s.path, cwd).display().to_string(),
            ]
        }))
        .collect();

    let mut widths = [0usize; 3];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (cell, w) in row.iter().zip(widths.iter()) {
            line.push_str(&format!("{cell:<width$}", width = w + COLUMN_GAP));
        }
        line.push_str(&row[3]);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `path` expressed relative to `base`, walking up with `..` where needed.
/// Falls back to `path` when the two share no root.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return path.to_path_buf();
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}
