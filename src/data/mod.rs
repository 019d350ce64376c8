mod loader;

pub use loader::{LoadError, load_tasks_from_json, write_tasks_to_json};
