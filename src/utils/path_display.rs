use std::path::{Component, Path};

/// 기준 폴더 아래의 경로를 상대 경로(`/` 구분자)로 표시한다.
/// 규칙: 기준 폴더 밖이면 HOME 경로를 `~`로 줄인 전체 경로를 표시한다.
pub fn display_below(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => join_components(rel),
        _ => shorten_home(&path.to_string_lossy()),
    }
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(v) => Some(v.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn shorten_home(path: &str) -> String {
    let Some(home_dir) = dirs::home_dir() else {
        return path.to_string();
    };
    let home_dir = home_dir.to_string_lossy().to_string();
    if home_dir.is_empty() {
        return path.to_string();
    }

    if path == home_dir {
        "~".to_string()
    } else if let Some(rest) = path.strip_prefix(&home_dir) {
        if rest.starts_with(std::path::MAIN_SEPARATOR) {
            format!("~{}", rest)
        } else {
            path.to_string()
        }
    } else {
        path.to_string()
    }
}
