//! Activity state graph
//!
//! Every legal transition lives in one immutable edge table; requests are
//! validated by lookup against it, never by chained conditionals. Each edge
//! carries its own precondition flag.

use crate::error::AppError;
use crate::models::enums::{ActivityState, Role};
use crate::workflow::authorizer;

/// One legal edge of the activity state graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: ActivityState,
    pub to: ActivityState,
    pub requires_closing_date: bool,
}

/// The complete set of legal transitions. Anything absent is rejected.
pub const TRANSITION_TABLE: [TransitionRule; 3] = [
    TransitionRule {
        from: ActivityState::Open,
        to: ActivityState::Closed,
        requires_closing_date: true,
    },
    TransitionRule {
        from: ActivityState::Closed,
        to: ActivityState::Reopened,
        requires_closing_date: false,
    },
    TransitionRule {
        from: ActivityState::Reopened,
        to: ActivityState::Closed,
        requires_closing_date: true,
    },
];

pub fn find_rule(from: ActivityState, to: ActivityState) -> Option<&'static TransitionRule> {
    TRANSITION_TABLE
        .iter()
        .find(|rule| rule.from == from && rule.to == to)
}

/// Legal targets from a state, before any role filtering
pub fn targets_from(from: ActivityState) -> Vec<ActivityState> {
    TRANSITION_TABLE
        .iter()
        .filter(|rule| rule.from == from)
        .map(|rule| rule.to)
        .collect()
}

/// Legal targets from a state as one role sees them
pub fn allowed_targets(from: ActivityState, role: Role) -> Vec<ActivityState> {
    TRANSITION_TABLE
        .iter()
        .filter(|rule| rule.from == from && authorizer::is_allowed(role, rule.from, rule.to))
        .map(|rule| rule.to)
        .collect()
}

/// Validate a requested transition.
///
/// Checks run in a fixed order: edge legality, then the closing-date
/// precondition, then role authorization. Resolving the activity itself
/// (and failing NotFound) is the caller's job before this runs.
pub fn evaluate(
    current: ActivityState,
    target: ActivityState,
    has_closing_date: bool,
    role: Role,
) -> Result<&'static TransitionRule, AppError> {
    let rule = find_rule(current, target).ok_or_else(|| invalid_edge(current, target))?;

    if rule.requires_closing_date && !has_closing_date {
        return Err(AppError::PreconditionFailed(format!(
            "A closing date is required to move an activity from {} to {}",
            current, target
        )));
    }

    if !authorizer::is_allowed(role, current, target) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not move an activity from {} to {}",
            role, current, target
        )));
    }

    Ok(rule)
}

fn invalid_edge(current: ActivityState, target: ActivityState) -> AppError {
    let reason = if current == target {
        format!("Activity is already {}", current)
    } else if current == ActivityState::Open && target == ActivityState::Reopened {
        "Cannot reopen an activity that was never closed".to_string()
    } else if target == ActivityState::Open {
        "A closed activity can only be reopened, not returned to open".to_string()
    } else {
        format!("No transition from {} to {}", current, target)
    };
    AppError::InvalidTransition(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ActivityState::{Closed, Open, Reopened};

    const ALL_STATES: [ActivityState; 3] = [Open, Closed, Reopened];
    const ALL_ROLES: [Role; 3] = [Role::Administrator, Role::Technician, Role::StandardUser];

    #[test]
    fn test_edge_table_contents() {
        assert!(find_rule(Open, Closed).unwrap().requires_closing_date);
        assert!(!find_rule(Closed, Reopened).unwrap().requires_closing_date);
        assert!(find_rule(Reopened, Closed).unwrap().requires_closing_date);
        assert_eq!(TRANSITION_TABLE.len(), 3);
    }

    #[test]
    fn test_self_transitions_never_legal() {
        for state in ALL_STATES {
            assert!(find_rule(state, state).is_none());
            for role in ALL_ROLES {
                let err = evaluate(state, state, true, role).unwrap_err();
                assert!(matches!(err, AppError::InvalidTransition(_)));
            }
        }
    }

    #[test]
    fn test_illegal_edges_rejected_for_every_role() {
        for role in ALL_ROLES {
            for (from, to) in [(Open, Reopened), (Closed, Open), (Reopened, Open)] {
                let err = evaluate(from, to, true, role).unwrap_err();
                assert!(matches!(err, AppError::InvalidTransition(_)));
            }
        }
    }

    #[test]
    fn test_closing_requires_date() {
        for from in [Open, Reopened] {
            let err = evaluate(from, Closed, false, Role::Administrator).unwrap_err();
            assert!(matches!(err, AppError::PreconditionFailed(_)));
            assert!(evaluate(from, Closed, true, Role::Administrator).is_ok());
        }
    }

    #[test]
    fn test_reopen_needs_no_date() {
        assert!(evaluate(Closed, Reopened, false, Role::Technician).is_ok());
    }

    #[test]
    fn test_missing_date_reported_before_role() {
        // A technician closing without a date must hear about the date,
        // not about the role.
        let err = evaluate(Open, Closed, false, Role::Technician).unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));
    }

    #[test]
    fn test_technician_forbidden_from_closing() {
        for from in [Open, Reopened] {
            let err = evaluate(from, Closed, true, Role::Technician).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
            assert!(evaluate(from, Closed, true, Role::Administrator).is_ok());
        }
    }

    #[test]
    fn test_standard_user_forbidden_on_legal_edges() {
        let err = evaluate(Closed, Reopened, false, Role::StandardUser).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_allowed_targets_filtered_by_role() {
        assert_eq!(allowed_targets(Open, Role::Administrator), vec![Closed]);
        assert!(allowed_targets(Open, Role::Technician).is_empty());
        assert!(allowed_targets(Open, Role::StandardUser).is_empty());

        assert_eq!(allowed_targets(Closed, Role::Administrator), vec![Reopened]);
        assert_eq!(allowed_targets(Closed, Role::Technician), vec![Reopened]);
        assert!(allowed_targets(Closed, Role::StandardUser).is_empty());

        assert_eq!(allowed_targets(Reopened, Role::Administrator), vec![Closed]);
        assert!(allowed_targets(Reopened, Role::Technician).is_empty());
    }

    #[test]
    fn test_targets_from_ignores_roles() {
        assert_eq!(targets_from(Open), vec![Closed]);
        assert_eq!(targets_from(Closed), vec![Reopened]);
        assert_eq!(targets_from(Reopened), vec![Closed]);
    }
}
