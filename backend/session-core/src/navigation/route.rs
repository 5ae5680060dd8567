use std::fmt;

pub const LOGIN_PATH: &str = "/login";
const SHELL_SEGMENT: &str = "shell";

/// A screen of the console.
///
/// Everything under `/shell` requires a session; `/login` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Housekeeping,
    HousekeepingDetail(String),
    ServiceOrders,
    ServiceOrderDetail(String),
    Guests,
    GuestDetail(String),
}

impl Route {
    /// Where a fresh login lands.
    pub fn landing() -> Self {
        Route::Housekeeping
    }

    /// Resolve a path, applying the console's redirects.
    ///
    /// - `""` and `/login` → [`Route::Login`]
    /// - `/shell` → [`Route::Housekeeping`]
    /// - `/shell/<section>` and `/shell/<section>/<id>`
    /// - anything else → [`Route::Login`]
    ///
    /// Query strings, fragments and repeated or trailing slashes are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["login"] => Route::Login,
            [SHELL_SEGMENT] => Route::Housekeeping,
            [SHELL_SEGMENT, "housekeeping"] => Route::Housekeeping,
            [SHELL_SEGMENT, "housekeeping", id] => Route::HousekeepingDetail(id.to_string()),
            [SHELL_SEGMENT, "service-orders"] => Route::ServiceOrders,
            [SHELL_SEGMENT, "service-orders", id] => Route::ServiceOrderDetail(id.to_string()),
            [SHELL_SEGMENT, "guests"] => Route::Guests,
            [SHELL_SEGMENT, "guests", id] => Route::GuestDetail(id.to_string()),
            _ => Route::Login,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Housekeeping => format!("/{SHELL_SEGMENT}/housekeeping"),
            Route::HousekeepingDetail(id) => format!("/{SHELL_SEGMENT}/housekeeping/{id}"),
            Route::ServiceOrders => format!("/{SHELL_SEGMENT}/service-orders"),
            Route::ServiceOrderDetail(id) => format!("/{SHELL_SEGMENT}/service-orders/{id}"),
            Route::Guests => format!("/{SHELL_SEGMENT}/guests"),
            Route::GuestDetail(id) => format!("/{SHELL_SEGMENT}/guests/{id}"),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
