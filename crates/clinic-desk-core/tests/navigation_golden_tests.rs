//! Golden tests for route guarding.
//!
//! Each case is a path visited by a given session and the expected outcome.

use clinic_desk_core::models::Role;
use clinic_desk_core::nav::{self, Navigation, Route};
use clinic_desk_core::session::SessionSnapshot;

#[derive(Clone, Copy)]
enum Visitor {
    SignedOut,
    Admin,
    Employee,
    /// Token present but the stored role was unreadable
    NoRole,
}

impl Visitor {
    fn snapshot(self) -> SessionSnapshot {
        let signed_in = |role: Option<Role>| SessionSnapshot {
            role,
            token: Some("tok".into()),
            username: Some("user".into()),
        };
        match self {
            Visitor::SignedOut => SessionSnapshot::default(),
            Visitor::Admin => signed_in(Some(Role::Admin)),
            Visitor::Employee => signed_in(Some(Role::Employee)),
            Visitor::NoRole => signed_in(None),
        }
    }
}

struct GoldenCase {
    id: &'static str,
    visitor: Visitor,
    path: &'static str,
    expected: Navigation,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    use Navigation::{Allow, Redirect};
    vec![
        GoldenCase {
            id: "landing-signed-out",
            visitor: Visitor::SignedOut,
            path: "/",
            expected: Allow(Route::Landing),
        },
        GoldenCase {
            id: "forgot-password-signed-out",
            visitor: Visitor::SignedOut,
            path: "/forgot-password",
            expected: Allow(Route::ForgotPassword),
        },
        GoldenCase {
            id: "protected-signed-out",
            visitor: Visitor::SignedOut,
            path: "/inventory",
            expected: Redirect(Route::Login),
        },
        GoldenCase {
            id: "profile-signed-out",
            visitor: Visitor::SignedOut,
            path: "/patient/12",
            expected: Redirect(Route::Login),
        },
        GoldenCase {
            id: "unknown-signed-out",
            visitor: Visitor::SignedOut,
            path: "/nowhere",
            expected: Redirect(Route::Landing),
        },
        GoldenCase {
            id: "login-while-signed-in",
            visitor: Visitor::Employee,
            path: "/login",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "employee-patients",
            visitor: Visitor::Employee,
            path: "/patient",
            expected: Allow(Route::Patients),
        },
        GoldenCase {
            id: "employee-patient-profile",
            visitor: Visitor::Employee,
            path: "/patient/12/",
            expected: Allow(Route::PatientProfile("12".into())),
        },
        GoldenCase {
            id: "employee-clock-in",
            visitor: Visitor::Employee,
            path: "/clock-in",
            expected: Allow(Route::ClockIn),
        },
        GoldenCase {
            id: "employee-reports",
            visitor: Visitor::Employee,
            path: "/reports",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "employee-employees",
            visitor: Visitor::Employee,
            path: "/employees",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "employee-employee-profile",
            visitor: Visitor::Employee,
            path: "/employees/5",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "employee-services-settings",
            visitor: Visitor::Employee,
            path: "/account/services",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "employee-security-settings",
            visitor: Visitor::Employee,
            path: "/account/security",
            expected: Allow(Route::AccountSecurity),
        },
        GoldenCase {
            id: "admin-reports-with-query",
            visitor: Visitor::Admin,
            path: "/reports?range=month",
            expected: Allow(Route::Reports),
        },
        GoldenCase {
            id: "admin-employee-profile",
            visitor: Visitor::Admin,
            path: "/employees/5",
            expected: Allow(Route::EmployeeProfile("5".into())),
        },
        GoldenCase {
            id: "admin-branch-settings",
            visitor: Visitor::Admin,
            path: "/account/branch",
            expected: Allow(Route::AccountBranch),
        },
        GoldenCase {
            id: "unknown-signed-in",
            visitor: Visitor::Admin,
            path: "/account/unknown",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "no-role-reports",
            visitor: Visitor::NoRole,
            path: "/reports",
            expected: Redirect(Route::Home),
        },
        GoldenCase {
            id: "no-role-inventory",
            visitor: Visitor::NoRole,
            path: "/inventory",
            expected: Allow(Route::Inventory),
        },
    ]
}

#[test]
fn test_golden_cases() {
    for case in get_golden_cases() {
        let outcome = nav::resolve(case.path, &case.visitor.snapshot());
        assert_eq!(outcome, case.expected, "Case {}: navigation mismatch", case.id);
    }
}

#[test]
fn test_every_menu_route_round_trips_its_path() {
    for item in nav::menu() {
        assert_eq!(
            Route::parse(&item.route.path()),
            Some(item.route.clone()),
            "Menu entry {} does not parse back",
            item.label
        );
    }
}

#[test]
fn test_visible_menu_matches_guard() {
    for visitor in [Visitor::Admin, Visitor::Employee] {
        let snapshot = visitor.snapshot();
        let visible = nav::visible_menu(snapshot.role);
        for item in nav::menu() {
            let shown = visible.iter().any(|v| v.route == item.route);
            let allowed = nav::guard(item.route.clone(), &snapshot) == Navigation::Allow(item.route);
            assert_eq!(shown, allowed, "Menu entry {} disagrees with guard", item.label);
        }
    }
}

#[test]
fn test_signed_out_sees_no_menu() {
    assert!(nav::visible_menu(None).is_empty());
}
