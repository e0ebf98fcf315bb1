// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "intake.json";

/// Return the application data directory. Nothing is created on disk.
pub fn data_dir() -> PathBuf {
    data_dir_from(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn data_dir_from(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // Try XDG data dir, then fallback to home
    let base = xdg
        .or_else(|| home.map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("intake")
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

/// Upload directories probed when neither flags nor config name any: the
/// data directory's `uploads/`, then `./uploads` for older deployments that
/// stored files beside the working directory.
pub fn default_search_roots() -> Vec<PathBuf> {
    vec![data_dir().join("uploads"), PathBuf::from("uploads")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_xdg() {
        let dir = data_dir_from(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/xdg/intake"));
    }

    #[test]
    fn falls_back_to_home_then_tmp() {
        assert_eq!(
            data_dir_from(None, Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share/intake")
        );
        assert_eq!(data_dir_from(None, None), PathBuf::from("/tmp/intake"));
    }

    #[test]
    fn default_roots_keep_order() {
        let roots = default_search_roots();
        assert_eq!(roots.len(), 2);
        assert!(roots[0].ends_with("intake/uploads"));
        assert_eq!(roots[1], PathBuf::from("uploads"));
    }
}
