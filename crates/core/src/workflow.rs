//! Report validation workflow state machine.
//!
//! A report's passage through organizational sign-off is a fixed forward
//! sequence of approval stages (chef de projet through client delivery).
//! Validation advances the report exactly one stage; rejection sends it
//! back to the rework stage named by an explicit per-stage reversion
//! table. All preconditions (acting at the current stage, mandatory
//! rejection reason, mandatory signature, well-formed client email) are
//! enforced here rather than left to the calling UI.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::roles;

/// Wire value accepting a report at a validation stage.
pub const ACTION_ACCEPTER: &str = "accepter";

/// Wire value rejecting a report at a validation stage.
pub const ACTION_REJETER: &str = "rejeter";

// ---------------------------------------------------------------------------
// Etape
// ---------------------------------------------------------------------------

/// A stage of the report's life inside the laboratory sign-off circuit.
///
/// The six approval stages form the forward circuit ([`Etape::CIRCUIT`]).
/// [`Etape::Traitement`] is the rework stage: rejected reports revert to
/// it and re-enter the circuit at [`Etape::ChefProjet`] on resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Etape {
    /// Rework/processing stage. Not part of the forward circuit.
    Traitement,
    ChefProjet,
    ChefService,
    DirecteurTechnique,
    DirecteurSnertp,
    Marketing,
    /// Terminal stage: the report has been sent to the client.
    Client,
}

impl Etape {
    /// The forward approval circuit, in canonical order.
    pub const CIRCUIT: [Etape; 6] = [
        Etape::ChefProjet,
        Etape::ChefService,
        Etape::DirecteurTechnique,
        Etape::DirecteurSnertp,
        Etape::Marketing,
        Etape::Client,
    ];

    /// The stages whose decision is a plain accept/reject with comment.
    ///
    /// Directeur SNERTP (signature + observations) and marketing (client
    /// email) each have their own dedicated operation instead.
    pub const ETAPES_VALIDATION: [Etape; 3] = [
        Etape::ChefProjet,
        Etape::ChefService,
        Etape::DirecteurTechnique,
    ];

    /// The database / wire value for this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Etape::Traitement => "traitement",
            Etape::ChefProjet => "chef_projet",
            Etape::ChefService => "chef_service",
            Etape::DirecteurTechnique => "directeur_technique",
            Etape::DirecteurSnertp => "directeur_snertp",
            Etape::Marketing => "marketing",
            Etape::Client => "client",
        }
    }

    /// Parse a wire/database value into a stage.
    pub fn parse(value: &str) -> Result<Etape, CoreError> {
        match value {
            "traitement" => Ok(Etape::Traitement),
            "chef_projet" => Ok(Etape::ChefProjet),
            "chef_service" => Ok(Etape::ChefService),
            "directeur_technique" => Ok(Etape::DirecteurTechnique),
            "directeur_snertp" => Ok(Etape::DirecteurSnertp),
            "marketing" => Ok(Etape::Marketing),
            "client" => Ok(Etape::Client),
            other => Err(CoreError::Validation(format!(
                "Invalid etape '{other}'. Must be one of: traitement, chef_projet, \
                 chef_service, directeur_technique, directeur_snertp, marketing, client"
            ))),
        }
    }

    /// The next stage on forward progression, `None` for the terminal stage.
    ///
    /// `traitement` hands over to `chef_projet`: that is the resubmission
    /// path, not a validation.
    pub fn suivante(self) -> Option<Etape> {
        match self {
            Etape::Traitement => Some(Etape::ChefProjet),
            Etape::ChefProjet => Some(Etape::ChefService),
            Etape::ChefService => Some(Etape::DirecteurTechnique),
            Etape::DirecteurTechnique => Some(Etape::DirecteurSnertp),
            Etape::DirecteurSnertp => Some(Etape::Marketing),
            Etape::Marketing => Some(Etape::Client),
            Etape::Client => None,
        }
    }

    /// The rework stage a rejection at this stage reverts the report to.
    ///
    /// Kept as an explicit per-stage table: the legacy system disagreed
    /// with itself on the target (some modules sent rejected reports to
    /// `chef_projet`, the reference backend sent every rejection to
    /// `traitement`). The table pins each stage to the reference behavior
    /// and makes a future per-stage product decision a one-line change.
    ///
    /// Stages whose operation cannot reject return `None`.
    pub fn cible_rejet(self) -> Option<Etape> {
        match self {
            Etape::ChefProjet => Some(Etape::Traitement),
            Etape::ChefService => Some(Etape::Traitement),
            Etape::DirecteurTechnique => Some(Etape::Traitement),
            Etape::Traitement
            | Etape::DirecteurSnertp
            | Etape::Marketing
            | Etape::Client => None,
        }
    }

    /// The role allowed to act while the workflow sits at this stage.
    ///
    /// `client` is terminal and has no internal actor.
    pub fn role_requis(self) -> Option<&'static str> {
        match self {
            Etape::Traitement => Some(roles::ROLE_TRAITEMENT),
            Etape::ChefProjet => Some(roles::ROLE_CHEF_PROJET),
            Etape::ChefService => Some(roles::ROLE_CHEF_SERVICE),
            Etape::DirecteurTechnique => Some(roles::ROLE_DIRECTEUR_TECHNIQUE),
            Etape::DirecteurSnertp => Some(roles::ROLE_DIRECTEUR_SNERTP),
            Etape::Marketing => Some(roles::ROLE_MARKETING),
            Etape::Client => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Statut
// ---------------------------------------------------------------------------

/// Overall workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statut {
    /// Waiting for a decision at the current stage.
    EnAttente,
    /// Terminal: the report was sent to the client.
    Valide,
    /// Rejected at some stage; sits at the rework stage until resubmitted.
    Rejete,
}

impl Statut {
    /// The database / wire value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Statut::EnAttente => "en_attente",
            Statut::Valide => "valide",
            Statut::Rejete => "rejete",
        }
    }

    /// Parse a wire/database value into a status.
    pub fn parse(value: &str) -> Result<Statut, CoreError> {
        match value {
            "en_attente" => Ok(Statut::EnAttente),
            "valide" => Ok(Statut::Valide),
            "rejete" => Ok(Statut::Rejete),
            other => Err(CoreError::Validation(format!(
                "Invalid statut '{other}'. Must be one of: en_attente, valide, rejete"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// The accept/reject decision carried by the `action` field of the
/// `valider_<etape>` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepter,
    Rejeter,
}

impl Decision {
    /// Parse the wire `action` value.
    pub fn parse(action: &str) -> Result<Decision, CoreError> {
        match action {
            ACTION_ACCEPTER => Ok(Decision::Accepter),
            ACTION_REJETER => Ok(Decision::Rejeter),
            other => Err(CoreError::Validation(format!(
                "Invalid action '{other}'. Must be one of: {ACTION_ACCEPTER}, {ACTION_REJETER}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Precondition checks
// ---------------------------------------------------------------------------

/// Verify that a workflow read from the store is decidable at `attendue`.
///
/// A workflow is decidable only while it sits at the expected stage with
/// `statut = en_attente`. A second decision attempt against an
/// already-advanced workflow fails here (or at the matching SQL guard if
/// the move happened after this check).
pub fn verifier_transition(
    etape_actuelle: &str,
    statut: &str,
    attendue: Etape,
) -> Result<(), CoreError> {
    let etape = Etape::parse(etape_actuelle)?;
    if etape != attendue {
        return Err(CoreError::Conflict(format!(
            "Workflow is at etape '{}', expected '{}'",
            etape.as_str(),
            attendue.as_str()
        )));
    }
    let statut = Statut::parse(statut)?;
    if statut != Statut::EnAttente {
        return Err(CoreError::Conflict(format!(
            "Workflow is not pending (statut '{}')",
            statut.as_str()
        )));
    }
    Ok(())
}

/// Verify that a rejected workflow can be resubmitted into the circuit.
///
/// Resubmission is only legal from the rework stage while the workflow is
/// marked rejected.
pub fn verifier_renvoi(etape_actuelle: &str, statut: &str) -> Result<(), CoreError> {
    let etape = Etape::parse(etape_actuelle)?;
    if etape != Etape::Traitement {
        return Err(CoreError::Conflict(format!(
            "Workflow is at etape '{}', only a workflow at 'traitement' can be resubmitted",
            etape.as_str()
        )));
    }
    let statut = Statut::parse(statut)?;
    if statut != Statut::Rejete {
        return Err(CoreError::Conflict(format!(
            "Workflow statut is '{}', only a rejected workflow can be resubmitted",
            statut.as_str()
        )));
    }
    Ok(())
}

/// A rejection must carry a non-empty reason.
pub fn valider_motif_rejet(motif: &str) -> Result<(), CoreError> {
    if motif.trim().is_empty() {
        return Err(CoreError::Validation(
            "A rejection requires a non-empty reason".to_string(),
        ));
    }
    Ok(())
}

/// The SNERTP director's advisory must carry a signature artifact.
pub fn valider_signature(signature: &str) -> Result<(), CoreError> {
    if signature.trim().is_empty() {
        return Err(CoreError::Validation(
            "The advisory requires a signature".to_string(),
        ));
    }
    Ok(())
}

/// Sending to the client requires a well-formed destination email.
pub fn valider_email_client(email: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() {
        return Err(CoreError::Validation(
            "A destination email address is required".to_string(),
        ));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
