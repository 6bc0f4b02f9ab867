//! Account forms and the (simulated) remote calls behind them

use super::route::Route;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info};

/// At least nine characters with an ASCII lowercase letter, an ASCII
/// uppercase letter and a symbol. Anything outside `[A-Za-z0-9]` counts as a
/// symbol, underscore and non-ASCII letters included.
pub fn password_meets_policy(password: &str) -> bool {
    password.chars().count() >= 9
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn is_valid(&self) -> bool {
        filled(&self.email) && filled(&self.password)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    pub fn is_valid(&self) -> bool {
        filled(&self.name)
            && filled(&self.email)
            && filled(&self.password)
            && password_meets_policy(&self.password)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerifyEmailForm {
    pub email: String,
}

impl VerifyEmailForm {
    pub fn is_valid(&self) -> bool {
        filled(&self.email)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn is_valid(&self) -> bool {
        filled(&self.new_password)
            && filled(&self.confirm_password)
            && self.new_password == self.confirm_password
    }
}

/// A submitted account form.
#[derive(Debug, Clone)]
pub enum AuthRequest {
    SignIn(SignInForm),
    SignUp(SignUpForm),
    VerifyEmail(VerifyEmailForm),
    ResetPassword(ResetPasswordForm),
}

impl AuthRequest {
    pub fn is_valid(&self) -> bool {
        match self {
            AuthRequest::SignIn(form) => form.is_valid(),
            AuthRequest::SignUp(form) => form.is_valid(),
            AuthRequest::VerifyEmail(form) => form.is_valid(),
            AuthRequest::ResetPassword(form) => form.is_valid(),
        }
    }

    /// The page the form lives on.
    pub fn route(&self) -> Route {
        match self {
            AuthRequest::SignIn(_) => Route::SignIn,
            AuthRequest::SignUp(_) => Route::SignUp,
            AuthRequest::VerifyEmail(_) => Route::VerifyEmail,
            AuthRequest::ResetPassword(_) => Route::ResetPassword,
        }
    }

    /// Where a successful submission leads.
    pub fn next_route(&self) -> Route {
        match self {
            AuthRequest::SignIn(_) => Route::AddTicker,
            AuthRequest::SignUp(_) => Route::SignIn,
            AuthRequest::VerifyEmail(_) => Route::ResetPassword,
            AuthRequest::ResetPassword(_) => Route::SignIn,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            AuthRequest::SignIn(_) => "Sign in",
            AuthRequest::SignUp(_) => "Sign up",
            AuthRequest::VerifyEmail(_) => "Verification email",
            AuthRequest::ResetPassword(_) => "Reset password",
        }
    }
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn submit(&self, request: &AuthRequest) -> Result<()>;
}

/// Stand-in for the account backend: waits for a fixed delay and succeeds.
pub struct SimulatedAuthService {
    delay: Duration,
}

impl SimulatedAuthService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AuthService for SimulatedAuthService {
    async fn submit(&self, request: &AuthRequest) -> Result<()> {
        debug!(request = request.describe(), delay = ?self.delay, "Simulating remote call");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Validates and submits a form. Invalid forms are rejected before any call;
/// a failed call is logged and leaves the user on the form's page.
pub async fn submit_form(service: &dyn AuthService, request: &AuthRequest) -> Result<Route> {
    if !request.is_valid() {
        bail!("{} form is incomplete or invalid", request.describe());
    }
    match service.submit(request).await {
        Ok(()) => {
            info!(next = %request.next_route(), "{} succeeded", request.describe());
            Ok(request.next_route())
        }
        Err(e) => {
            error!(error = %e, "{} failed", request.describe());
            Ok(request.route())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingAuthService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthService for FailingAuthService {
        async fn submit(&self, _request: &AuthRequest) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("backend unavailable"))
        }
    }

    fn sign_up(password: &str) -> SignUpForm {
        SignUpForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_password_policy() {
        assert!(password_meets_policy("Secret#123"));
        assert!(password_meets_policy("Under_score"));
        assert!(!password_meets_policy("Short#1a"));
        assert!(!password_meets_policy("nouppercase#1"));
        assert!(!password_meets_policy("NOLOWERCASE#1"));
        assert!(!password_meets_policy("NoSymbolsHere1"));
    }

    #[test]
    fn test_password_policy_uses_ascii_classes() {
        // Non-ASCII letters count as symbols, never as cased letters
        assert!(password_meets_policy("Abcdefghé"));
        assert!(!password_meets_policy("ÉÉÉÉÉÉÉÉé#"));
        assert!(!password_meets_policy("ÄÖÜÉÈÀ#a1"));
    }

    #[test]
    fn test_form_validation() {
        assert!(!SignInForm::default().is_valid());
        assert!(
            !SignInForm {
                email: "a@b.c".to_string(),
                password: "   ".to_string()
            }
            .is_valid()
        );
        assert!(sign_up("Secret#123").is_valid());
        assert!(!sign_up("secret").is_valid());
        assert!(
            VerifyEmailForm {
                email: "a@b.c".to_string()
            }
            .is_valid()
        );
        assert!(
            !ResetPasswordForm {
                new_password: "one".to_string(),
                confirm_password: "two".to_string()
            }
            .is_valid()
        );
    }

    #[tokio::test]
    async fn test_submit_routes_to_next_page() {
        let service = SimulatedAuthService::new(Duration::from_millis(1));
        let request = AuthRequest::SignIn(SignInForm {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        });
        assert_eq!(
            submit_form(&service, &request).await.unwrap(),
            Route::AddTicker
        );

        let request = AuthRequest::VerifyEmail(VerifyEmailForm {
            email: "a@b.c".to_string(),
        });
        assert_eq!(
            submit_form(&service, &request).await.unwrap(),
            Route::ResetPassword
        );
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let service = FailingAuthService {
            calls: AtomicUsize::new(0),
        };
        let request = AuthRequest::SignUp(sign_up("weak"));

        assert!(submit_form(&service, &request).await.is_err());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_call_stays_on_page() {
        let service = FailingAuthService {
            calls: AtomicUsize::new(0),
        };
        let request = AuthRequest::SignUp(sign_up("Secret#123"));

        assert_eq!(submit_form(&service, &request).await.unwrap(), Route::SignUp);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }
}
