pub mod login;
pub mod logout;
pub mod organizers;
pub mod password_reset;

pub use login::login;
pub use logout::logout;
pub use organizers::{create_organizer, delete_all_organizers, delete_organizer, list_organizers};
pub use password_reset::{request_password_reset, reset_password};
