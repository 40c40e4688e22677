//! Well-known role names.
//!
//! These must match the `users.role` values seeded by the deployment and
//! carried in JWT claims. One role per workflow actor, plus the lab-side
//! roles that never touch the validation circuit directly.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_RECEPTION: &str = "reception";
pub const ROLE_TRAITEMENT: &str = "traitement";
pub const ROLE_CHEF_PROJET: &str = "chef_projet";
pub const ROLE_CHEF_SERVICE: &str = "chef_service";
pub const ROLE_DIRECTEUR_TECHNIQUE: &str = "directeur_technique";
pub const ROLE_DIRECTEUR_SNERTP: &str = "directeur_snertp";
pub const ROLE_MARKETING: &str = "marketing";

/// All role values accepted in `users.role`.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_RECEPTION,
    ROLE_TRAITEMENT,
    ROLE_CHEF_PROJET,
    ROLE_CHEF_SERVICE,
    ROLE_DIRECTEUR_TECHNIQUE,
    ROLE_DIRECTEUR_SNERTP,
    ROLE_MARKETING,
];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), crate::error::CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(crate::error::CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(validate_role("stagiaire").is_err());
        assert!(validate_role("").is_err());
    }
}
