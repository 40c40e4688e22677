//! Dot-separated event name vocabulary for the `events` ledger.

use geolab_core::workflow::Etape;

/// A workflow was opened and entered the circuit at `chef_projet`.
pub const WORKFLOW_CREE: &str = "workflow.cree";

/// The SNERTP director recorded an advisory with signature.
pub const WORKFLOW_AVISE: &str = "workflow.avise.directeur_snertp";

/// Marketing dispatched the report to the client (terminal).
pub const WORKFLOW_ENVOYE_CLIENT: &str = "workflow.envoye.client";

/// A rejected report re-entered the circuit from the rework stage.
pub const WORKFLOW_RENVOYE: &str = "workflow.renvoye";

/// A sample was registered.
pub const ECHANTILLON_CREE: &str = "echantillon.cree";

/// A client was registered.
pub const CLIENT_CREE: &str = "client.cree";

/// A user account was created.
pub const USER_CREE: &str = "user.cree";

/// Event name for accepting a report at a validation stage,
/// e.g. `workflow.valide.chef_service`.
pub fn workflow_valide(etape: Etape) -> String {
    format!("workflow.valide.{}", etape.as_str())
}

/// Event name for rejecting a report at a validation stage,
/// e.g. `workflow.rejete.chef_service`.
pub fn workflow_rejete(etape: Etape) -> String {
    format!("workflow.rejete.{}", etape.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_event_names_carry_the_stage() {
        assert_eq!(workflow_valide(Etape::ChefProjet), "workflow.valide.chef_projet");
        assert_eq!(
            workflow_rejete(Etape::DirecteurTechnique),
            "workflow.rejete.directeur_technique"
        );
    }
}
