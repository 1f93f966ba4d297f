mod handler;
mod model;

pub use handler::{create_area, delete_area};
