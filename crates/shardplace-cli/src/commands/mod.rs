pub mod place;
pub mod plugins;
