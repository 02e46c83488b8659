use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// qmake (`*.pro`) or CMake based Qt project
    Qt,
    /// PyQt / PySide application
    Python,
    Node,
    Rust,
    Generic,
}

pub fn detect_project_type(base_dir: &Path) -> ProjectType {
    if base_dir.join("CMakeLists.txt").exists() || has_qmake_project(base_dir) {
        ProjectType::Qt
    } else if base_dir.join("requirements.txt").exists()
        || base_dir.join("pyproject.toml").exists()
        || base_dir.join("setup.py").exists()
    {
        ProjectType::Python
    } else if base_dir.join("package.json").exists() {
        ProjectType::Node
    } else if base_dir.join("Cargo.toml").exists() {
        ProjectType::Rust
    } else {
        ProjectType::Generic
    }
}

fn has_qmake_project(base_dir: &Path) -> bool {
    fs::read_dir(base_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().is_some_and(|ext| ext == "pro"))
        })
        .unwrap_or(false)
}

/// Directory names skipped while discovering `.ts` files
pub fn get_default_exclusions(project_type: ProjectType) -> Vec<&'static str> {
    let mut exclusions = vec![".git", ".svn", ".hg", ".idea", ".vscode"];

    match project_type {
        ProjectType::Qt => {
            exclusions.extend_from_slice(&["build", "out", "3rdparty"]);
        }
        ProjectType::Python => {
            exclusions.extend_from_slice(&[
                "venv",
                ".venv",
                "env",
                "__pycache__",
                "build",
                "dist",
                ".pytest_cache",
                ".mypy_cache",
            ]);
        }
        ProjectType::Node => {
            exclusions.extend_from_slice(&["node_modules", "dist", "build", "coverage"]);
        }
        ProjectType::Rust => {
            exclusions.extend_from_slice(&["target"]);
        }
        ProjectType::Generic => {
            exclusions.extend_from_slice(&[
                "node_modules",
                "__pycache__",
                ".venv",
                "build",
                "dist",
                "target",
            ]);
        }
    }

    exclusions
}
