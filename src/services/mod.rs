pub mod session;
pub mod supervisor;

pub use session::{Session, SessionParams};
pub use supervisor::Supervisor;
