use std::{env, fs, path::PathBuf, process};

use crate::{Config, Error, Preferences, load_from_path};

fn temp_path(name: &str) -> PathBuf {
    let mut p = env::temp_dir();
    p.push(format!("chrome-config-{}-{}", process::id(), name));
    p
}

#[test]
fn empty_source_yields_defaults() {
    let cfg = Config::from_ron("()").unwrap();
    assert_eq!(cfg, Config::default());
    assert!(cfg.prefs.close_animation);
    assert!(!cfg.prefs.persistent_notifications);
    assert_eq!(cfg.timings.close_frames, 15);
}

#[test]
fn partial_sections_merge_with_defaults() {
    let cfg = Config::from_ron(
        "(prefs: (persistent_notifications: true), timings: (tick_ms: 4), \
         theme: (accent: \"red\"))",
    )
    .unwrap();
    assert_eq!(
        cfg.prefs,
        Preferences {
            persistent_notifications: true,
            ..Preferences::default()
        }
    );
    assert_eq!(cfg.timings.tick_ms, 4);
    assert_eq!(cfg.timings.notify_step_px, 8);
    assert_eq!(cfg.theme.accent_rgb().0, 255);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Config::from_ron("(prefs: (shiny: true))").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.pretty().starts_with("Config parse error"));
}

#[test]
fn load_from_path_reports_path() {
    let p = temp_path("bad.ron");
    fs::write(&p, "(prefs: (").unwrap();
    let err = load_from_path(&p).unwrap_err();
    assert_eq!(err.path(), Some(p.as_path()));
    fs::remove_file(&p).ok();

    let good = temp_path("good.ron");
    fs::write(&good, "(chrome: (border: 7))").unwrap();
    let cfg = load_from_path(&good).unwrap();
    assert_eq!(cfg.chrome.border, 7);
    assert_eq!(cfg.chrome.title_bar, 30);
    fs::remove_file(&good).ok();
}

#[test]
fn wrong_extension_is_a_read_error() {
    let err = load_from_path(&temp_path("config.toml")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}
