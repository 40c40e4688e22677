//! Sample (echantillon) domain constants and validation helpers.
//!
//! Covers the lifecycle statuses a sample moves through at the
//! laboratory, the material nature / sondage / priority vocabularies,
//! and the formatting rules for generated sample and client codes.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Lifecycle statuses
// ---------------------------------------------------------------------------

/// Registered, waiting to be stored.
pub const STATUT_ATTENTE: &str = "attente";

/// Stored, waiting to be dispatched to the test sections.
pub const STATUT_STOCKAGE: &str = "stockage";

/// Undergoing laboratory tests.
pub const STATUT_ESSAIS: &str = "essais";

/// Test results being decoded.
pub const STATUT_DECODIFICATION: &str = "decodification";

/// Report being worked on by the processing team.
pub const STATUT_TRAITEMENT: &str = "traitement";

/// Report inside the sign-off circuit.
pub const STATUT_VALIDATION: &str = "validation";

/// Report approved end-to-end and sent to the client.
pub const STATUT_VALIDE: &str = "valide";

/// Report rejected at a sign-off stage.
pub const STATUT_REJETE: &str = "rejete";

/// All valid sample statuses.
pub const VALID_STATUTS: &[&str] = &[
    STATUT_ATTENTE,
    STATUT_STOCKAGE,
    STATUT_ESSAIS,
    STATUT_DECODIFICATION,
    STATUT_TRAITEMENT,
    STATUT_VALIDATION,
    STATUT_VALIDE,
    STATUT_REJETE,
];

/// Status a freshly registered sample starts in.
pub const STATUT_INITIAL: &str = STATUT_STOCKAGE;

// ---------------------------------------------------------------------------
// Material nature / sondage / priority
// ---------------------------------------------------------------------------

pub const NATURE_SOL: &str = "Sol";
pub const NATURE_GRAVIER: &str = "Gravier";

/// All valid material natures.
pub const VALID_NATURES: &[&str] = &[NATURE_SOL, NATURE_GRAVIER];

/// Cored sampling. Requires a borehole number.
pub const SONDAGE_CAROTTE: &str = "carotte";

/// Bulk sampling.
pub const SONDAGE_VRAC: &str = "vrac";

/// All valid sondage kinds.
pub const VALID_SONDAGES: &[&str] = &[SONDAGE_CAROTTE, SONDAGE_VRAC];

pub const PRIORITE_NORMALE: &str = "normale";
pub const PRIORITE_URGENTE: &str = "urgente";

/// All valid priorities.
pub const VALID_PRIORITES: &[&str] = &[PRIORITE_NORMALE, PRIORITE_URGENTE];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a sample status is one of the accepted values.
pub fn validate_statut(statut: &str) -> Result<(), CoreError> {
    if VALID_STATUTS.contains(&statut) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid statut '{statut}'. Must be one of: {}",
            VALID_STATUTS.join(", ")
        )))
    }
}

/// Validate that a material nature is one of the accepted values.
pub fn validate_nature(nature: &str) -> Result<(), CoreError> {
    if VALID_NATURES.contains(&nature) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid nature '{nature}'. Must be one of: {}",
            VALID_NATURES.join(", ")
        )))
    }
}

/// Validate a sondage kind and its borehole number requirement.
///
/// Cored samples must carry a non-empty `numero_sondage`; bulk samples
/// may omit it.
pub fn validate_sondage(sondage: &str, numero_sondage: Option<&str>) -> Result<(), CoreError> {
    if !VALID_SONDAGES.contains(&sondage) {
        return Err(CoreError::Validation(format!(
            "Invalid sondage '{sondage}'. Must be one of: {}",
            VALID_SONDAGES.join(", ")
        )));
    }
    if sondage == SONDAGE_CAROTTE
        && numero_sondage.map_or(true, |n| n.trim().is_empty())
    {
        return Err(CoreError::Validation(
            "A cored sample requires a numero_sondage".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a priority is one of the accepted values.
pub fn validate_priorite(priorite: &str) -> Result<(), CoreError> {
    if VALID_PRIORITES.contains(&priorite) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priorite '{priorite}'. Must be one of: {}",
            VALID_PRIORITES.join(", ")
        )))
    }
}

/// Validate the sampled depth interval, in meters below ground.
pub fn validate_profondeurs(debut: f64, fin: f64) -> Result<(), CoreError> {
    if !debut.is_finite() || !fin.is_finite() {
        return Err(CoreError::Validation(
            "Depths must be finite numbers".to_string(),
        ));
    }
    if debut < 0.0 || fin < 0.0 {
        return Err(CoreError::Validation(
            "Depths must not be negative".to_string(),
        ));
    }
    if fin < debut {
        return Err(CoreError::Validation(format!(
            "profondeur_fin ({fin}) must not be above profondeur_debut ({debut})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Generated codes
// ---------------------------------------------------------------------------

/// The code prefix for a material nature: its first letter, uppercased
/// (`Sol` → `S`, `Gravier` → `G`). Call with a validated nature.
pub fn prefixe_nature(nature: &str) -> char {
    nature
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('S')
}

/// Format a sample code: `{prefix}-{counter:04}/{yy}`.
///
/// The counter is per prefix and per two-digit year, so the first soil
/// sample of 2026 is `S-0001/26`.
pub fn formater_code(nature: &str, numero: u32, annee: i32) -> String {
    format!(
        "{}-{:04}/{:02}",
        prefixe_nature(nature),
        numero,
        annee.rem_euclid(100)
    )
}

/// Format a client code: `CLI-{counter:03}`.
pub fn formater_code_client(numero: u32) -> String {
    format!("CLI-{numero:03}")
}
