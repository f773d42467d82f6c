pub mod events;
pub mod handler;

pub use events::{InputEvent, MapEvent, MouseButton};
pub use handler::{EventCallback, EventManager};
