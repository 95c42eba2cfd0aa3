pub mod paths;
pub mod terminal;

pub use paths::format_path_with_tilde;
pub use terminal::strip_ansi_codes;
