pub mod assembly_manager;
pub mod assets;
pub mod concat;
pub mod duration;
pub mod encoder;
pub mod overlay;
