//! Lexical path helpers.
//!
//! None of these touch the filesystem. Symlinks are not resolved, so two
//! spellings of the same directory only compare equal after [`normalize`].

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// `..` never climbs above the root of an absolute path.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(s) => out.push(s),
        }
    }
    out
}

/// Make `path` absolute against the process working directory and normalize it.
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path).map(|p| normalize(&p))
}

/// Path of `to` relative to `from`, both absolute and normalized.
///
/// Climbs with `..` when `to` is not below `from`. Returns an empty path when
/// they are equal.
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for comp in &to[common..] {
        out.push(comp.as_os_str());
    }
    out
}

/// Render a relative path with `/` separators regardless of platform.
#[must_use]
pub fn to_unix(path: &Path) -> String {
    path.components()
        .filter_map(|comp| match comp {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `path` stays inside its base: non-empty and without leading `..`.
#[must_use]
pub fn is_contained(relative: &Path) -> bool {
    !relative.as_os_str().is_empty()
        && !relative.is_absolute()
        && !matches!(relative.components().next(), Some(Component::ParentDir))
}
