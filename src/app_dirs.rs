use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn preferences_path() -> PathBuf {
        ProjectDirs::from("", "", "flick")
            .map(|proj_dirs| proj_dirs.config_dir().join("preferences.json"))
            .unwrap_or_else(|| PathBuf::from("flick_preferences.json"))
    }

    /// Default directory for CSV/JSON session exports.
    pub fn export_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("flick")
                .join("sessions")
        } else {
            ProjectDirs::from("", "", "flick")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("sessions"))
                .unwrap_or_else(|| PathBuf::from("flick_sessions"))
        }
    }
}
