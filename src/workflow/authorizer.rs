//! Role policy for state transitions

use crate::models::enums::{ActivityState, Role};

/// Decide whether `role` may drive an activity across a legal edge.
///
/// Administrators pass for any legal edge. Technicians pass for any legal
/// edge except one targeting `closed`; closing an activity is reserved to
/// administrators. Standard users hold no transition rights. The policy is
/// a single target exclusion, not a matrix.
pub fn is_allowed(role: Role, _from: ActivityState, to: ActivityState) -> bool {
    match role {
        Role::Administrator => true,
        Role::Technician => to != ActivityState::Closed,
        Role::StandardUser => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ActivityState::{Closed, Open, Reopened};

    #[test]
    fn test_administrator_passes_every_edge() {
        assert!(is_allowed(Role::Administrator, Open, Closed));
        assert!(is_allowed(Role::Administrator, Closed, Reopened));
        assert!(is_allowed(Role::Administrator, Reopened, Closed));
    }

    #[test]
    fn test_technician_cannot_target_closed() {
        assert!(!is_allowed(Role::Technician, Open, Closed));
        assert!(!is_allowed(Role::Technician, Reopened, Closed));
        assert!(is_allowed(Role::Technician, Closed, Reopened));
    }

    #[test]
    fn test_standard_user_has_no_transition_rights() {
        assert!(!is_allowed(Role::StandardUser, Open, Closed));
        assert!(!is_allowed(Role::StandardUser, Closed, Reopened));
        assert!(!is_allowed(Role::StandardUser, Reopened, Closed));
    }
}
