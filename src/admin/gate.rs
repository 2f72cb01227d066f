/// Admin Capability Gate
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capabilities granted to admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminPermission {
    /// Review employment verification requests
    VerifyWork,
}

impl AdminPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminPermission::VerifyWork => "verify_work",
        }
    }

    /// Every capability an admin holds
    pub fn all() -> &'static [AdminPermission] {
        &[AdminPermission::VerifyWork]
    }
}

/// Maps actor DIDs to admin capabilities.
///
/// The admin set is fixed at construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AdminGate {
    admin_dids: BTreeSet<String>,
}

impl AdminGate {
    pub fn new<I, S>(admin_dids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admin_dids: admin_dids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_admin(&self, did: &str) -> bool {
        self.admin_dids.contains(did)
    }

    /// Permissions held by a DID; empty for non-admins
    pub fn permissions(&self, did: &str) -> BTreeSet<AdminPermission> {
        if self.is_admin(did) {
            AdminPermission::all().iter().copied().collect()
        } else {
            BTreeSet::new()
        }
    }

    pub fn check_permission(&self, did: &str, permission: AdminPermission) -> bool {
        self.permissions(did).contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "did:plc:uw2cz5hnxy2i6jbmh6t2i7hi";

    #[test]
    fn test_non_admin_has_nothing() {
        let gate = AdminGate::new([ADMIN]);

        for did in ["did:plc:alice", "", "did:web:example.com", "DID:PLC:UW2CZ5HNXY2I6JBMH6T2I7HI"] {
            assert!(!gate.is_admin(did));
            assert!(gate.permissions(did).is_empty());
            assert!(!gate.check_permission(did, AdminPermission::VerifyWork));
        }
    }

    #[test]
    fn test_admin_has_exactly_verify_work() {
        let gate = AdminGate::new([ADMIN, "did:plc:second"]);

        for did in [ADMIN, "did:plc:second"] {
            assert!(gate.is_admin(did));
            let perms = gate.permissions(did);
            assert_eq!(perms.len(), 1);
            assert!(perms.contains(&AdminPermission::VerifyWork));
            assert!(gate.check_permission(did, AdminPermission::VerifyWork));
        }
    }

    #[test]
    fn test_permission_names() {
        assert_eq!(AdminPermission::VerifyWork.as_str(), "verify_work");
        assert_eq!(
            serde_json::to_string(&AdminPermission::VerifyWork).unwrap(),
            "\"verify_work\""
        );
    }
}
