use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    VerifyEmail,
    ResetPassword,
    AddTicker,
    Overview,
    ZoomIn,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/",
            Route::SignUp => "/signup",
            Route::VerifyEmail => "/verify-email",
            Route::ResetPassword => "/reset-password",
            Route::AddTicker => "/add-ticker",
            Route::Overview => "/overview",
            Route::ZoomIn => "/zoom-in",
        }
    }

    /// Primary pages where going back asks to log out.
    pub fn is_guarded(&self) -> bool {
        matches!(self, Route::AddTicker | Route::Overview)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_lowercase().as_str() {
            "" | "signin" | "sign-in" => Ok(Route::SignIn),
            "signup" | "sign-up" => Ok(Route::SignUp),
            "verify-email" => Ok(Route::VerifyEmail),
            "reset-password" => Ok(Route::ResetPassword),
            "add-ticker" | "tickers" => Ok(Route::AddTicker),
            "overview" => Ok(Route::Overview),
            "zoom-in" | "zoom" => Ok(Route::ZoomIn),
            _ => Err(anyhow::anyhow!("Unknown route: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in [
            Route::SignIn,
            Route::SignUp,
            Route::VerifyEmail,
            Route::ResetPassword,
            Route::AddTicker,
            Route::Overview,
            Route::ZoomIn,
        ] {
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
        assert!("/settings".parse::<Route>().is_err());
    }

    #[test]
    fn test_only_primary_pages_are_guarded() {
        assert!(Route::Overview.is_guarded());
        assert!(Route::AddTicker.is_guarded());
        assert!(!Route::ZoomIn.is_guarded());
        assert!(!Route::SignIn.is_guarded());
    }
}
