pub mod assets;
pub mod audit;
pub mod media;
pub mod public;
pub mod taxonomy;
