use thiserror::Error;

/// The current user lacks the group membership required to talk to the
/// container runtime. Raised by the `up` pre-flight check, before any
/// orchestrator process is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "o usuário atual não está no grupo '{group}'. \
     Adicione-o ao '/etc/group' ou rode 'composebox fix-up'"
)]
pub struct GroupMembershipError {
    pub group: String,
}

impl GroupMembershipError {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }
}
