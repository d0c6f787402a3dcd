pub mod organizer;
pub mod pelada;

pub use organizer::{Organizer, OrganizerWithPeladas};
pub use pelada::Pelada;
