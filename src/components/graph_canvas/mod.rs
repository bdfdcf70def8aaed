mod camera;
mod component;
mod layered;
pub mod layout;
mod render;
mod state;
pub mod zoom;

pub use component::GraphCanvas;
pub use state::Hit;
