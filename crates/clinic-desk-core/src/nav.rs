//! Routes and role-gated navigation.

use std::fmt;

use crate::models::Role;
use crate::session::SessionSnapshot;

/// Every screen the desk can show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    ForgotPassword,
    Home,
    Patients,
    /// `/patient/:id`
    PatientProfile(String),
    PatientRecords,
    Inventory,
    Employees,
    /// `/employees/:id`
    EmployeeProfile(String),
    ClockIn,
    Reports,
    AccountDetails,
    AccountSecurity,
    AccountServices,
    AccountBranch,
}

impl Route {
    /// Parse a path. Trailing slashes and query strings are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["forgot-password"] => Route::ForgotPassword,
            ["home"] => Route::Home,
            ["patient"] => Route::Patients,
            ["patient", id] => Route::PatientProfile(id.to_string()),
            ["patientrecords"] => Route::PatientRecords,
            ["inventory"] => Route::Inventory,
            ["employees"] => Route::Employees,
            ["employees", id] => Route::EmployeeProfile(id.to_string()),
            ["clock-in"] => Route::ClockIn,
            ["reports"] => Route::Reports,
            ["account", "details"] => Route::AccountDetails,
            ["account", "security"] => Route::AccountSecurity,
            ["account", "services"] => Route::AccountServices,
            ["account", "branch"] => Route::AccountBranch,
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::ForgotPassword => "/forgot-password".into(),
            Route::Home => "/home".into(),
            Route::Patients => "/patient".into(),
            Route::PatientProfile(id) => format!("/patient/{}", id),
            Route::PatientRecords => "/patientrecords".into(),
            Route::Inventory => "/inventory".into(),
            Route::Employees => "/employees".into(),
            Route::EmployeeProfile(id) => format!("/employees/{}", id),
            Route::ClockIn => "/clock-in".into(),
            Route::Reports => "/reports".into(),
            Route::AccountDetails => "/account/details".into(),
            Route::AccountSecurity => "/account/security".into(),
            Route::AccountServices => "/account/services".into(),
            Route::AccountBranch => "/account/branch".into(),
        }
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Landing | Route::Login | Route::ForgotPassword)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

const EVERYONE: &[Role] = &[Role::Admin, Role::Employee];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// A sidebar entry and the roles allowed to see it.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
    pub roles: &'static [Role],
}

impl MenuItem {
    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The full menu, in display order.
pub fn menu() -> Vec<MenuItem> {
    vec![
        MenuItem { label: "Home", route: Route::Home, roles: EVERYONE },
        MenuItem { label: "Patients", route: Route::Patients, roles: EVERYONE },
        MenuItem { label: "Patient Records", route: Route::PatientRecords, roles: EVERYONE },
        MenuItem { label: "Inventory", route: Route::Inventory, roles: EVERYONE },
        MenuItem { label: "Clock In", route: Route::ClockIn, roles: EVERYONE },
        MenuItem { label: "Employees", route: Route::Employees, roles: ADMIN_ONLY },
        MenuItem { label: "Reports", route: Route::Reports, roles: ADMIN_ONLY },
        MenuItem { label: "Account Details", route: Route::AccountDetails, roles: EVERYONE },
        MenuItem { label: "Security", route: Route::AccountSecurity, roles: EVERYONE },
        MenuItem { label: "Services", route: Route::AccountServices, roles: ADMIN_ONLY },
        MenuItem { label: "Branches", route: Route::AccountBranch, roles: ADMIN_ONLY },
    ]
}

/// Menu entries visible to `role`. Nothing is visible when signed out.
pub fn visible_menu(role: Option<Role>) -> Vec<MenuItem> {
    match role {
        Some(role) => menu().into_iter().filter(|item| item.allows(role)).collect(),
        None => Vec::new(),
    }
}

/// Outcome of trying to visit a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow(Route),
    Redirect(Route),
}

/// Decide whether `route` may be shown for `session`.
///
/// Signed-out users go to login; signed-in users skip login; routes whose
/// menu entry excludes the user's role send them home.
pub fn guard(route: Route, session: &SessionSnapshot) -> Navigation {
    if !session.is_authenticated() {
        return if route.is_public() {
            Navigation::Allow(route)
        } else {
            Navigation::Redirect(Route::Login)
        };
    }

    if route == Route::Login {
        return Navigation::Redirect(Route::Home);
    }

    // A session restored without a readable role gets the narrowest access
    let role = session.role.unwrap_or(Role::Employee);
    let gate = match &route {
        Route::EmployeeProfile(_) => Route::Employees,
        other => other.clone(),
    };
    let forbidden = menu()
        .iter()
        .any(|item| item.route == gate && !item.allows(role));

    if forbidden {
        Navigation::Redirect(Route::Home)
    } else {
        Navigation::Allow(route)
    }
}

/// Parse and guard a path. Unknown paths land on the start screen.
pub fn resolve(path: &str, session: &SessionSnapshot) -> Navigation {
    match Route::parse(path) {
        Some(route) => guard(route, session),
        None if session.is_authenticated() => Navigation::Redirect(Route::Home),
        None => Navigation::Redirect(Route::Landing),
    }
}
