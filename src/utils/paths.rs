use std::path::Path;

/// Formats a path with ~ substitution for the home directory
///
/// Used when telling the user where an export landed.
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use medigenius_chat::format_path_with_tilde;
///
/// let path = PathBuf::from("/home/alice/Downloads/medigenius-chat-1.txt");
/// // "~/Downloads/medigenius-chat-1.txt" when the home directory is /home/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    let home = dirs::home_dir();
    format_with_home(path, home.as_deref())
}

fn format_with_home(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}
