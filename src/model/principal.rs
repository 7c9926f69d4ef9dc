use crate::errors::{AppError, AppResult};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Capability {
    Employee,
    Manager,
}

/// The authenticated actor behind a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: u64,
    pub username: String,
    pub is_manager: bool,
}

impl Principal {
    pub fn capabilities(&self) -> &'static [Capability] {
        if self.is_manager {
            &[Capability::Employee, Capability::Manager]
        } else {
            &[Capability::Employee]
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// The one authorization guard every workflow operation goes through.
    pub fn authorize(&self, capability: Capability) -> AppResult<()> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Managers may read anyone's records, everyone else only their own.
    pub fn authorize_owner_or_manager(&self, owner_id: u64) -> AppResult<()> {
        if self.user_id == owner_id {
            return Ok(());
        }
        self.authorize(Capability::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(user_id: u64, is_manager: bool) -> Principal {
        Principal {
            user_id,
            username: format!("user{user_id}"),
            is_manager,
        }
    }

    #[test]
    fn test_employee_lacks_manager_capability() {
        let p = principal(1, false);
        assert!(p.authorize(Capability::Employee).is_ok());
        assert!(matches!(
            p.authorize(Capability::Manager),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_owner_or_manager() {
        assert!(principal(1, false).authorize_owner_or_manager(1).is_ok());
        assert!(principal(1, false).authorize_owner_or_manager(2).is_err());
        assert!(principal(9, true).authorize_owner_or_manager(2).is_ok());
    }
}
