use std::path::PathBuf;

use homedir::my_home;

/// KDE plasma caches the current POTD under the wallpaper engine
/// directory; the screen locker keeps its own copy.
const TARGET_SUBDIRS: [&str; 2] = [
    ".cache/plasmashell/plasma_engine_potd",
    ".cache/kscreenlocker_greet/plasma_engine_potd",
];

/// Built-in destination list. Directories that do not exist are skipped
/// at deploy time, never created.
pub fn default_targets() -> Vec<PathBuf> {
    let home = match my_home() {
        Ok(Some(home)) => home,
        _ => {
            log::warn!("could not resolve home directory; no default destinations");
            return Vec::new();
        }
    };
    TARGET_SUBDIRS.iter().map(|sub| home.join(sub)).collect()
}
