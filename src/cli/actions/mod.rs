pub mod server;

use crate::auth::AuthKind;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        auth_type: AuthKind,
        session_name: String,
    },
}
