pub mod init;
pub mod list;
pub mod run;
pub mod session;
pub mod validate;
pub mod watch;

pub use init::init_command;
pub use list::list_command;
pub use run::{exec_command, run_command};
pub use session::session_command;
pub use validate::validate_command;
pub use watch::watch_command;
