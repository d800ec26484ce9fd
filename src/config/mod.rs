// src/config/mod.rs
pub mod portal;

pub use portal::{load_portal_config_default, load_portal_config_from, PortalConfig};
