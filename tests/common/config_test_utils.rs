use std::ffi::OsString;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

const RUFF_VARS: [&str; 4] = ["RUFF_COUNT", "RUFF_PORT", "RUFF_HIDE_QR", "RUFF_MULTIPLE"];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

struct EnvRestore {
    xdg_config_home: Option<OsString>,
    ruff_vars: Vec<(&'static str, Option<OsString>)>,
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        restore_var("XDG_CONFIG_HOME", self.xdg_config_home.take());
        for (name, value) in self.ruff_vars.drain(..) {
            restore_var(name, value);
        }
    }
}

fn restore_var(name: &str, value: Option<OsString>) {
    match value {
        Some(value) => std::env::set_var(name, value),
        None => std::env::remove_var(name),
    }
}

fn write_config(temp_dir: &TempDir, contents: &str) {
    let app_config_dir = temp_dir.path().join("ruff");
    std::fs::create_dir_all(&app_config_dir).expect("create config dir");
    std::fs::write(app_config_dir.join("config.toml"), contents).expect("write config");
}

/// Run `f` with a private config file and no `RUFF_*` variables set.
///
/// Tests touching the environment are serialised through one lock.
pub fn with_config_env<T>(config_toml: &str, f: impl FnOnce() -> T) -> T {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().expect("temp dir");

    write_config(&temp_dir, config_toml);

    let restore = EnvRestore {
        xdg_config_home: std::env::var_os("XDG_CONFIG_HOME"),
        ruff_vars: RUFF_VARS
            .iter()
            .map(|name| (*name, std::env::var_os(name)))
            .collect(),
    };

    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    for name in RUFF_VARS {
        std::env::remove_var(name);
    }

    let result = f();
    drop(restore);
    result
}
