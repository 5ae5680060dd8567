use crate::error::ConsoleError;

use session_core::AppContext;
use session_core::connectivity::Connectivity;
use session_core::login::{LoginFlowController, LoginStepKind};

use common::ErrorLocation;

use std::panic::Location;

use log::error;

pub fn whoami(ctx: &AppContext) -> String {
    let user = ctx.session.current_user();
    if user.is_empty() {
        "Not signed in.".to_string()
    } else {
        format!("{} ({})", user, ctx.session.user_initials())
    }
}

pub fn status(ctx: &AppContext, flow: &LoginFlowController) -> String {
    let step = match flow.step_kind() {
        LoginStepKind::AwaitingPin => "PIN".to_string(),
        LoginStepKind::AwaitingPassword => format!(
            "password for {}",
            flow.verified_user().unwrap_or_default()
        ),
    };

    format!(
        "{} [{}] api={} route={} login-step={} network={}",
        ctx.environment.app_name,
        ctx.environment.name,
        ctx.environment.api_base_url,
        ctx.router.current(),
        step,
        if ctx.network.is_online() { "online" } else { "offline" }
    )
}

pub fn set_online(ctx: &AppContext, online: bool) -> String {
    ctx.network.set_online(online);
    if online {
        "Network marked online.".to_string()
    } else {
        "Network marked offline.".to_string()
    }
}

/// Clear the session and the login form.
pub async fn logout(ctx: &AppContext, flow: &LoginFlowController) -> Result<String, ConsoleError> {
    let landed = ctx.logout().await.map_err(|e| {
        error!("Logout failed: {}", e);
        ConsoleError::Core {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    flow.reset();
    Ok(format!("Signed out. Now at {landed}."))
}
