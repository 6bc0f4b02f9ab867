use super::ui;
use crate::core::auth::{AuthRequest, AuthService, submit_form};
use anyhow::Result;

/// Submits an account form behind a spinner and reports where it leads.
pub async fn run(service: &dyn AuthService, request: &AuthRequest) -> Result<()> {
    let route = submit(service, request).await?;
    if route == request.route() {
        println!(
            "{}",
            ui::style_text("Request failed, please try again", ui::StyleType::Error)
        );
    } else {
        println!(
            "Done. Continue at {}",
            ui::style_text(route.path(), ui::StyleType::Highlight)
        );
    }
    Ok(())
}

/// Like [`run`] but returns the next route instead of printing it.
pub async fn submit(
    service: &dyn AuthService,
    request: &AuthRequest,
) -> Result<crate::core::Route> {
    let pb = ui::new_spinner("Contacting account service...");
    let result = submit_form(service, request).await;
    pb.finish_and_clear();
    result
}
