mod client;

pub use client::{CONFIG_ENV, ClientConfig, config_path, load_config, save_config};
