//! The role-gated transition table for daily reports.
//!
//! Every status change a caller can request resolves through [`transition_for`]
//! (forward moves) or [`can_reject`] (rejection). Call sites never compare
//! role or status strings themselves.

use crate::enums::{ReportStatus, Role};

/// A single row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub role: Role,
    pub from: ReportStatus,
    pub to: ReportStatus,
}

/// How strictly `reject` checks the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectPolicy {
    /// Any status may be rejected, including `draft` and `final_approved`.
    #[default]
    AnyStatus,
    /// Only `pending_approval` and `approved_by_manager` may be rejected.
    ReviewableOnly,
}

/// All forward transitions, in lifecycle order.
pub const TRANSITIONS: &[Transition] = &[
    Transition {
        role: Role::Worker,
        from: ReportStatus::Draft,
        to: ReportStatus::PendingApproval,
    },
    Transition {
        role: Role::Worker,
        from: ReportStatus::Rejected,
        to: ReportStatus::PendingApproval,
    },
    Transition {
        role: Role::SiteManager,
        from: ReportStatus::PendingApproval,
        to: ReportStatus::ApprovedByManager,
    },
    Transition {
        role: Role::Admin,
        from: ReportStatus::ApprovedByManager,
        to: ReportStatus::FinalApproved,
    },
];

/// Look up the next status for `(role, current)`. `None` means the move is not allowed.
#[must_use]
pub fn transition_for(role: Role, current: ReportStatus) -> Option<ReportStatus> {
    TRANSITIONS
        .iter()
        .find(|t| t.role == role && t.from == current)
        .map(|t| t.to)
}

/// Whether `role` may reject a report currently in `current` under `policy`.
#[must_use]
pub const fn can_reject(role: Role, current: ReportStatus, policy: RejectPolicy) -> bool {
    if !role.is_reviewer() {
        return false;
    }
    match policy {
        RejectPolicy::AnyStatus => true,
        RejectPolicy::ReviewableOnly => current.is_under_review(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Worker, ReportStatus::Draft, ReportStatus::PendingApproval)]
    #[case(Role::Worker, ReportStatus::Rejected, ReportStatus::PendingApproval)]
    #[case(Role::SiteManager, ReportStatus::PendingApproval, ReportStatus::ApprovedByManager)]
    #[case(Role::Admin, ReportStatus::ApprovedByManager, ReportStatus::FinalApproved)]
    fn table_rows_resolve(#[case] role: Role, #[case] from: ReportStatus, #[case] to: ReportStatus) {
        assert_eq!(transition_for(role, from), Some(to));
    }

    #[test]
    fn every_pair_outside_the_table_is_rejected() {
        for role in Role::ALL {
            for status in ReportStatus::ALL {
                let in_table = TRANSITIONS
                    .iter()
                    .any(|t| t.role == role && t.from == status);
                assert_eq!(
                    transition_for(role, status).is_some(),
                    in_table,
                    "{role} from {status}"
                );
            }
        }
    }

    #[test]
    fn nothing_leaves_final_approved() {
        for role in Role::ALL {
            assert_eq!(transition_for(role, ReportStatus::FinalApproved), None);
        }
    }

    #[test]
    fn workers_cannot_reject() {
        for status in ReportStatus::ALL {
            assert!(!can_reject(Role::Worker, status, RejectPolicy::AnyStatus));
        }
    }

    #[test]
    fn reviewable_only_policy_limits_rejection() {
        assert!(can_reject(
            Role::SiteManager,
            ReportStatus::FinalApproved,
            RejectPolicy::AnyStatus
        ));
        assert!(!can_reject(
            Role::SiteManager,
            ReportStatus::FinalApproved,
            RejectPolicy::ReviewableOnly
        ));
        assert!(can_reject(
            Role::Admin,
            ReportStatus::ApprovedByManager,
            RejectPolicy::ReviewableOnly
        ));
        assert!(!can_reject(
            Role::Admin,
            ReportStatus::Draft,
            RejectPolicy::ReviewableOnly
        ));
    }
}
