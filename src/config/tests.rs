use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::chapter::ChapterMode;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_legato_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LEGATO_CONFIG_PATH", "/tmp/legato-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/legato-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("legato")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("legato")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_chapter_mode_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[scan]
extensions = ["m4b"]
recursive = true
include_hidden = false
follow_links = false
max_depth = 3

[cover]
image_names = ["cover.jpg"]
container_extension = "m4a"

[chapters]
mode = "per-file"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LEGATO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("LEGATO__SCAN__RECURSIVE");

    let s = Settings::load().unwrap();
    assert_eq!(s.scan.extensions, vec!["m4b".to_string()]);
    assert!(s.scan.recursive);
    assert!(!s.scan.include_hidden);
    assert!(!s.scan.follow_links);
    assert_eq!(s.scan.max_depth, Some(3));
    assert_eq!(s.cover.image_names, vec!["cover.jpg".to_string()]);
    assert_eq!(s.cover.container_extension, "m4a");
    assert!(matches!(s.chapters.mode, ChapterMode::File));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[scan]
recursive = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LEGATO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("LEGATO__SCAN__RECURSIVE", "true");

    let s = Settings::load().unwrap();
    assert!(s.scan.recursive);
}

#[test]
fn validate_rejects_empty_extension_list() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());
    s.scan.extensions.clear();
    assert!(s.validate().is_err());
}

#[test]
fn parse_list_normalizes_entries() {
    assert_eq!(
        parse_list(" .M4B, mp3 ,, .Flac "),
        vec!["m4b".to_string(), "mp3".to_string(), "flac".to_string()]
    );
    assert!(parse_list(" , ").is_empty());
}
