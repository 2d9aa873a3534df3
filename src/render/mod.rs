pub mod context;
pub mod pipeline;
pub mod renderer;
pub mod sprite;
pub mod texture;
