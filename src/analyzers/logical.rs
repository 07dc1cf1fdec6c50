//! Authentication/authorization prerequisites, signup-before-login, and
//! terminal logout classification, driven by keyword matches against
//! operation id, path, and tags.

use crate::{
    method::Method,
    model::{Dependency, DependencyKind, Operation},
};

const AUTH_KEYWORDS: &[&str] = &["login", "signin", "authenticate", "auth"];
const SIGNUP_KEYWORDS: &[&str] = &["signup", "register", "create_account"];
const LOGOUT_KEYWORDS: &[&str] = &["logout", "signout"];
const ADMIN_KEYWORDS: &[&str] = &["admin", "administrator"];

fn matches_any(op: &Operation, keywords: &[&str]) -> bool {
    let haystacks = std::iter::once(op.operation_id.to_lowercase())
        .chain(std::iter::once(op.path.to_lowercase()))
        .chain(op.tags.iter().map(|t| t.to_lowercase()));
    haystacks
        .flat_map(|h| keywords.iter().map(move |k| (h.clone(), *k)))
        .any(|(h, k)| h.contains(k))
}

pub fn analyze(operations: &[Operation]) -> Vec<Dependency> {
    let mut dependencies = Vec::new();

    let auth_ops: Vec<&Operation> = operations.iter().filter(|op| matches_any(op, AUTH_KEYWORDS)).collect();
    let signup_ops: Vec<&Operation> =
        operations.iter().filter(|op| matches_any(op, SIGNUP_KEYWORDS)).collect();
    let admin_ops: Vec<&Operation> =
        operations.iter().filter(|op| matches_any(op, ADMIN_KEYWORDS)).collect();

    for signup in &signup_ops {
        for login in &auth_ops {
            if signup.operation_id == login.operation_id {
                continue;
            }
            dependencies.push(
                Dependency::new(
                    signup.operation_id.clone(),
                    login.operation_id.clone(),
                    DependencyKind::Workflow,
                    0.8,
                )
                .with_reason(format!(
                    "{} must complete before {} can authenticate",
                    signup.operation_id, login.operation_id
                )),
            );
        }
    }

    for auth in &auth_ops {
        for admin in &admin_ops {
            if auth.operation_id == admin.operation_id {
                continue;
            }
            dependencies.push(
                Dependency::new(
                    auth.operation_id.clone(),
                    admin.operation_id.clone(),
                    DependencyKind::Authorization,
                    0.9,
                )
                .with_reason(format!("{} requires prior authentication", admin.operation_id)),
            );
        }
    }

    for op in operations {
        if matches_any(op, AUTH_KEYWORDS) {
            continue;
        }
        for auth in &auth_ops {
            if auth.operation_id == op.operation_id {
                continue;
            }
            if !op.security.is_empty() {
                dependencies.push(
                    Dependency::new(
                        auth.operation_id.clone(),
                        op.operation_id.clone(),
                        DependencyKind::Authentication,
                        0.95,
                    )
                    .with_reason(format!("{} declares a security requirement", op.operation_id)),
                );
            } else if !op.path_params.is_empty() && op.method != Method::Get {
                dependencies.push(
                    Dependency::new(
                        auth.operation_id.clone(),
                        op.operation_id.clone(),
                        DependencyKind::Authentication,
                        0.7,
                    )
                    .with_reason(format!(
                        "{} mutates a specific resource, heuristically assumed to require auth",
                        op.operation_id
                    )),
                );
            }
        }
    }

    dependencies
}

/// Marks logout-style operations terminal in their annotations; sequencing
/// treats terminal operations as sinks and emits no outgoing edges for
/// them. Run once, before the analyzer pass that reads `is_terminal`.
pub fn mark_terminals(operations: &mut [Operation]) {
    for op in operations.iter_mut() {
        if matches_any(op, LOGOUT_KEYWORDS) {
            op.annotations
                .insert("terminal".to_owned(), serde_json::Value::Bool(true));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_precedes_login() {
        let signup = Operation::new("signup", Method::Post, "/signup");
        let login = Operation::new("login", Method::Post, "/login");
        let deps = analyze(&[signup, login]);
        assert!(deps
            .iter()
            .any(|d| d.source == "signup" && d.target == "login" && d.kind == DependencyKind::Workflow));
    }

    #[test]
    fn auth_required_for_admin_route() {
        let login = Operation::new("login", Method::Post, "/login");
        let mut admin_op = Operation::new("listUsers", Method::Get, "/admin/users");
        admin_op.security = vec!["bearer".to_owned()];
        let deps = analyze(&[login, admin_op]);
        assert!(deps.iter().any(|d| d.kind == DependencyKind::Authorization));
        assert!(deps.iter().any(|d| d.kind == DependencyKind::Authentication));
    }

    #[test]
    fn logout_marked_terminal() {
        let mut ops = vec![Operation::new("logout", Method::Post, "/logout")];
        mark_terminals(&mut ops);
        assert!(ops[0].is_terminal());
    }
}
