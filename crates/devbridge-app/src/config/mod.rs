//! Configuration loading for devbridge

pub mod settings;
pub mod types;

pub use settings::{
    config_path, init_config_dir, load_screen_fixture, load_settings, load_settings_file,
    load_settings_file_strict, load_settings_strict,
};
pub use types::*;
