#[cfg(test)]
mod tests {
    use skr_core::*;
    use std::path::PathBuf;

    // ── Error display ──────────────────────────────────────────

    #[test]
    fn test_config_read_display_names_path() {
        let err = SkrError::ConfigRead {
            path: PathBuf::from("/tmp/.skr.yaml"),
            reason: "bad yaml".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load config /tmp/.skr.yaml: bad yaml"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = SkrError::NotFound("ghcr.io/acme/skill:v1".into());
        assert_eq!(
            err.to_string(),
            "reference ghcr.io/acme/skill:v1 not found in store"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> Result<()> {
            std::fs::read("/definitely/not/a/real/path/skr")?;
            Ok(())
        }
        assert!(matches!(fails(), Err(SkrError::Io(_))));
    }

    // ── Skipped diagnostics ────────────────────────────────────

    #[test]
    fn test_skipped_display_and_serialize() {
        let skipped = Skipped::new("repo:v1", "manifest missing");
        assert_eq!(skipped.to_string(), "repo:v1: manifest missing");
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["item"], "repo:v1");
        assert_eq!(json["reason"], "manifest missing");
    }

    // ── Overlay ────────────────────────────────────────────────

    #[test]
    fn test_overlay_keeps_acceptance_order() {
        let merged = overlay_first_wins(
            [vec!["b", "a"], vec!["c", "a", "b", "d"]],
            |s| s.to_string(),
        );
        assert_eq!(merged, vec!["b", "a", "c", "d"]);
    }
}
