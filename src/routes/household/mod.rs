mod handler;
mod model;

pub use handler::{find_by_id, update_name};
