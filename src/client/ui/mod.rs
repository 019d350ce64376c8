mod quiz;
mod render;
mod task_box;

pub use render::render;
