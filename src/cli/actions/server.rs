use crate::{
    api,
    auth::AuthConfig,
    cli::actions::Action,
};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            auth_type,
            session_name,
        } => {
            let config = AuthConfig::new(auth_type).with_session_cookie_name(session_name);

            api::new(port, dsn, config).await?;
        }
    }

    Ok(())
}
