pub mod auth;
pub mod email;
pub mod organizer;
pub mod password;
pub mod token;

pub use auth::AuthService;
pub use email::{EmailSender, EmailService, SmtpEmailSender};
pub use organizer::OrganizerService;
pub use password::PasswordHasher;
pub use token::{TokenPurpose, TokenService};
