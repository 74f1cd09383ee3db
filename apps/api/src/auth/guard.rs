use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::warn;

use crate::auth::session::{Role, Session};
use crate::errors::AppError;
use crate::state::AppState;

pub const SIGN_IN_PATH: &str = "/auth/signin";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Page sections the frontend gates. Everything else is public.
const GATED_PREFIXES: &[&str] = &["/dashboard", "/admin", "/recruiter", "/manager", "/auth"];

/// Page prefixes that only one role may open.
const ROLE_SECTIONS: &[(&str, Role)] = &[
    ("/admin", Role::Admin),
    ("/recruiter", Role::Recruiter),
    ("/manager", Role::Manager),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteAccess {
    Allow,
    Redirect { location: String },
}

/// Decides whether a page may be shown to the given session.
///
/// - Pages outside `GATED_PREFIXES` are always allowed.
/// - `/auth/*` pages redirect signed-in users to the dashboard.
/// - Without a session every other gated page redirects to sign-in, remembering
///   where the user was going in `from`.
/// - Role sections redirect users without the matching role to the dashboard.
pub fn route_access(path: &str, query: Option<&str>, session: Option<&Session>) -> RouteAccess {
    if !GATED_PREFIXES.iter().any(|prefix| in_section(path, prefix)) {
        return RouteAccess::Allow;
    }

    if in_section(path, "/auth") {
        return match session {
            Some(_) => redirect(DASHBOARD_PATH),
            None => RouteAccess::Allow,
        };
    }

    let Some(session) = session else {
        let mut from = path.to_string();
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            from.push('?');
            from.push_str(q.trim_start_matches('?'));
        }
        return redirect(&format!("{SIGN_IN_PATH}?from={}", encode_uri_component(&from)));
    };

    for (prefix, role) in ROLE_SECTIONS {
        if in_section(path, prefix) && session.role != *role {
            return redirect(DASHBOARD_PATH);
        }
    }

    RouteAccess::Allow
}

/// `/admin` and `/admin/users` are in the `/admin` section, `/administrator` is not.
fn in_section(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn redirect(location: &str) -> RouteAccess {
    RouteAccess::Redirect {
        location: location.to_string(),
    }
}

/// Percent-encodes everything except the characters JavaScript's
/// `encodeURIComponent` leaves alone, so `from` round-trips through the frontend.
fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Middleware for API routes that need a signed-in user.
/// Inserts the verified `Session` into request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.session_keys.session_from_headers(request.headers()) {
        Some(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        None => {
            warn!(
                "session missing or invalid, denying {} {}",
                request.method(),
                request.uri().path()
            );
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_anonymous_user_is_sent_to_sign_in_with_from() {
        let access = route_access("/dashboard/jobs", Some("tab=open&page=2"), None);
        assert_eq!(
            access,
            RouteAccess::Redirect {
                location: "/auth/signin?from=%2Fdashboard%2Fjobs%3Ftab%3Dopen%26page%3D2"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_anonymous_user_may_open_auth_pages() {
        assert_eq!(route_access("/auth/signin", None, None), RouteAccess::Allow);
    }

    #[test]
    fn test_signed_in_user_is_bounced_from_auth_pages() {
        let s = session(Role::User);
        assert_eq!(
            route_access("/auth/signin", None, Some(&s)),
            RouteAccess::Redirect {
                location: DASHBOARD_PATH.to_string()
            }
        );
    }

    #[test]
    fn test_role_sections_require_matching_role() {
        let recruiter = session(Role::Recruiter);
        assert_eq!(
            route_access("/recruiter/pipeline", None, Some(&recruiter)),
            RouteAccess::Allow
        );
        assert_eq!(
            route_access("/admin/users", None, Some(&recruiter)),
            RouteAccess::Redirect {
                location: DASHBOARD_PATH.to_string()
            }
        );
        // Admins get no blanket pass into other role sections.
        let admin = session(Role::Admin);
        assert!(matches!(
            route_access("/manager/reports", None, Some(&admin)),
            RouteAccess::Redirect { .. }
        ));
    }

    #[test]
    fn test_signed_in_user_may_open_unrestricted_pages() {
        let s = session(Role::User);
        assert_eq!(route_access("/dashboard", None, Some(&s)), RouteAccess::Allow);
    }

    #[test]
    fn test_public_pages_need_no_session() {
        for page in ["/", "/jobs", "/leaderboard", "/candidates", "/settings"] {
            assert_eq!(route_access(page, None, None), RouteAccess::Allow, "{page}");
        }
        assert_eq!(
            route_access("/administrator", Some("x=1"), None),
            RouteAccess::Allow
        );
    }

    #[test]
    fn test_dashboard_root_still_requires_session() {
        assert_eq!(
            route_access("/dashboard", None, None),
            RouteAccess::Redirect {
                location: "/auth/signin?from=%2Fdashboard".to_string()
            }
        );
        assert!(matches!(
            route_access("/manager", None, None),
            RouteAccess::Redirect { .. }
        ));
    }

    #[test]
    fn test_encode_uri_component_matches_javascript() {
        assert_eq!(encode_uri_component("/a b?c=d&e"), "%2Fa%20b%3Fc%3Dd%26e");
        assert_eq!(encode_uri_component("it's-(ok)!~*_."), "it's-(ok)!~*_.");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }
}
