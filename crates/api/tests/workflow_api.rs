//! HTTP-level integration tests for the `/workflows` sign-off circuit:
//! forward progression, rejection routing, stage guards, role gates,
//! and resubmission.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, build_test_app, get, post_json, seed_echantillon, seed_user};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Tokens for one user per acting role of the circuit.
struct Acteurs {
    traitement: String,
    chef_projet: String,
    chef_service: String,
    directeur_technique: String,
    directeur_snertp: String,
    marketing: String,
}

async fn seed_acteurs(pool: &PgPool) -> Acteurs {
    Acteurs {
        traitement: seed_user(pool, "traitement1", "traitement").await.1,
        chef_projet: seed_user(pool, "chef_projet1", "chef_projet").await.1,
        chef_service: seed_user(pool, "chef_service1", "chef_service").await.1,
        directeur_technique: seed_user(pool, "dt1", "directeur_technique").await.1,
        directeur_snertp: seed_user(pool, "dsnertp1", "directeur_snertp").await.1,
        marketing: seed_user(pool, "marketing1", "marketing").await.1,
    }
}

/// Open a workflow for a fresh sample and return its JSON representation.
async fn ouvrir_workflow(app: Router, pool: &PgPool, token: &str) -> Value {
    let (_, echantillon) = seed_echantillon(pool).await;
    let response = post_json(
        app,
        "/api/v1/workflows",
        token,
        json!({
            "echantillon_id": echantillon.id,
            "file_name": "rapport.pdf",
            "file_data": "JVBERi0xLjQ=",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Forward progression (round-trip through the whole circuit)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_circuit_ends_terminal_valide(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    assert_eq!(workflow["etape_actuelle"], "chef_projet");
    assert_eq!(workflow["statut"], "en_attente");
    let id = workflow["id"].as_str().unwrap().to_string();

    // Three sequential validations, each exactly one step forward.
    let stages = [
        ("valider_chef_projet", &acteurs.chef_projet, "chef_service"),
        (
            "valider_chef_service",
            &acteurs.chef_service,
            "directeur_technique",
        ),
        (
            "valider_directeur_technique",
            &acteurs.directeur_technique,
            "directeur_snertp",
        ),
    ];
    for (operation, token, attendue) in stages {
        let response = post_json(
            app.clone(),
            &format!("/api/v1/workflows/{id}/{operation}"),
            token,
            json!({ "action": "accepter", "comment": "Conforme" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "operation {operation}");

        let data = &body_json(response).await["data"];
        assert_eq!(data["etape_actuelle"], attendue);
        assert_eq!(data["statut"], "en_attente");
    }

    // SNERTP advisory with mandatory signature hands over to marketing.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/aviser_directeur_snertp"),
        &acteurs.directeur_snertp,
        json!({ "observations": "Bon pour diffusion", "signature": "iVBORw0KGgo=" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["etape_actuelle"], "marketing");
    assert_eq!(data["avise_directeur_snertp"], true);
    assert_eq!(data["statut"], "en_attente");

    // Marketing dispatch is the terminal transition.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/envoyer_client"),
        &acteurs.marketing,
        json!({ "email_client": "client@laborex.test" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["etape_actuelle"], "client");
    assert_eq!(data["statut"], "valide");
    assert_eq!(data["processed_by_marketing"], true);
    assert_eq!(data["email_client"], "client@laborex.test");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_stage_decision_flags_stamped_on_accept(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/valider_chef_projet"),
        &acteurs.chef_projet,
        json!({ "action": "accepter", "comment": "RAS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["validation_chef_projet"], true);
    assert_eq!(data["rejet_chef_projet"], false);
    assert_eq!(data["commentaire_chef_projet"], "RAS");
    assert!(!data["date_validation_chef_projet"].is_null());
    assert!(
        !data["date_envoi_chef_service"].is_null(),
        "the hand-off to the next stage must be stamped"
    );
}

// ---------------------------------------------------------------------------
// Stage guard (idempotence) and role gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_validate_on_advanced_workflow_conflicts(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();
    let uri = format!("/api/v1/workflows/{id}/valider_chef_projet");
    let body = json!({ "action": "accepter", "comment": "" });

    let first = post_json(app.clone(), &uri, &acteurs.chef_projet, body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    // The workflow moved to chef_service; the replay must fail its stage
    // guard instead of double-advancing.
    let second = post_json(app.clone(), &uri, &acteurs.chef_projet, body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");

    let response = get(app.clone(), &format!("/api/v1/workflows/{id}"), &acteurs.chef_projet).await;
    let data = &body_json(response).await["data"];
    assert_eq!(
        data["etape_actuelle"], "chef_service",
        "a failed replay must leave the state unchanged"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_role_is_forbidden(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();

    // The chef de service may not decide at the chef de projet stage.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/valider_chef_projet"),
        &acteurs.chef_service,
        json!({ "action": "accepter", "comment": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(app.clone(), &format!("/api/v1/workflows/{id}"), &acteurs.chef_service).await;
    let data = &body_json(response).await["data"];
    assert_eq!(data["etape_actuelle"], "chef_projet");
}

// ---------------------------------------------------------------------------
// Precondition validation (promoted from the UI layer to the core)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_without_reason_is_refused(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();
    let uri = format!("/api/v1/workflows/{id}/valider_chef_projet");

    for body in [
        json!({ "action": "rejeter" }),
        json!({ "action": "rejeter", "comment": "" }),
        json!({ "action": "rejeter", "comment": "   " }),
    ] {
        let response = post_json(app.clone(), &uri, &acteurs.chef_projet, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_action_is_refused(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/valider_chef_projet"),
        &acteurs.chef_projet,
        json!({ "action": "peut-etre", "comment": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn advisory_requires_signature(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/aviser_directeur_snertp"),
        &acteurs.directeur_snertp,
        json!({ "observations": "Sans signature" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_requires_wellformed_email(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap();

    for email in ["", "pas-un-email"] {
        let response = post_json(
            app.clone(),
            &format!("/api/v1/workflows/{id}/envoyer_client"),
            &acteurs.marketing,
            json!({ "email_client": email }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "email {email:?}");
    }
}

// ---------------------------------------------------------------------------
// Rejection path and resubmission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_reverts_to_rework_stage(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/valider_chef_projet"),
        &acteurs.chef_projet,
        json!({ "action": "accepter", "comment": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/valider_chef_service"),
        &acteurs.chef_service,
        json!({ "action": "rejeter", "comment": "incomplete data" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["rejet_chef_service"], true);
    assert_eq!(data["validation_chef_service"], false);
    assert_eq!(data["statut"], "rejete");
    assert_eq!(data["etape_actuelle"], "traitement");
    assert_eq!(data["raison_rejet"], "incomplete data");
    assert!(!data["date_rejet"].is_null());

    // The rejected workflow no longer shows up in the stage's pending list.
    let response = get(
        app.clone(),
        "/api/v1/workflows/par_etape?etape=chef_service",
        &acteurs.chef_service,
    )
    .await;
    let pending = body_json(response).await["data"].as_array().unwrap().clone();
    assert!(pending.is_empty());

    // But it does show up among the rejected, awaiting rework.
    let response = get(app.clone(), "/api/v1/workflows/rejetes", &acteurs.traitement).await;
    let rejetes = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(rejetes.len(), 1);
    assert_eq!(rejetes[0]["id"].as_str().unwrap(), id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resubmission_reenters_at_chef_projet_with_clean_flags(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let id = workflow["id"].as_str().unwrap().to_string();

    // Reject straight at chef_projet.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{id}/valider_chef_projet"),
        &acteurs.chef_projet,
        json!({ "action": "rejeter", "comment": "Courbe granulométrique manquante" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Resubmission is the rework stage's operation, not the reviewers'.
    let uri = format!("/api/v1/workflows/{id}/renvoyer_validation");
    let body = json!({
        "observations": "Courbe ajoutée",
        "file_name": "rapport_v2.pdf",
        "file_data": "JVBERi0xLjQtdjI=",
    });
    let forbidden = post_json(app.clone(), &uri, &acteurs.chef_projet, body.clone()).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let response = post_json(app.clone(), &uri, &acteurs.traitement, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["etape_actuelle"], "chef_projet");
    assert_eq!(data["statut"], "en_attente");
    assert_eq!(data["rejet_chef_projet"], false);
    assert_eq!(data["validation_chef_projet"], false);
    assert_eq!(data["observations_traitement"], "Courbe ajoutée");
    assert_eq!(data["file_name"], "rapport_v2.pdf");

    // A resubmission only applies to a rejected workflow at rework.
    let replay = post_json(
        app.clone(),
        &uri,
        &acteurs.traitement,
        json!({ "observations": "encore" }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Listings and lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn par_etape_only_lists_the_requested_stage(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    // Two workflows: one stays at chef_projet, one advances to chef_service.
    let premier = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let second = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let second_id = second["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{second_id}/valider_chef_projet"),
        &acteurs.chef_projet,
        json!({ "action": "accepter", "comment": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        app.clone(),
        "/api/v1/workflows/par_etape?etape=chef_projet",
        &acteurs.chef_projet,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], premier["id"]);
    assert!(data.iter().all(|w| w["etape_actuelle"] == "chef_projet"));

    // A stage with nothing pending yields an empty list, never an error.
    let response = get(
        app.clone(),
        "/api/v1/workflows/par_etape?etape=marketing",
        &acteurs.marketing,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    // An unknown stage name is a validation error, not a silent empty list.
    let response = get(
        app.clone(),
        "/api/v1/workflows/par_etape?etape=inconnu",
        &acteurs.chef_projet,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_etape_actuelle(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    // Two workflows: one stays at chef_projet, one advances to chef_service.
    ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let second = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let second_id = second["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/workflows/{second_id}/valider_chef_projet"),
        &acteurs.chef_projet,
        json!({ "action": "accepter", "comment": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The list filter uses the record's own field name, `etape_actuelle`.
    let response = get(
        app.clone(),
        "/api/v1/workflows?etape_actuelle=chef_service",
        &acteurs.chef_service,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(
        data.len(),
        1,
        "the etape_actuelle filter must narrow the list, not be ignored"
    );
    assert_eq!(data[0]["id"].as_str().unwrap(), second_id);

    // A bad stage value errors instead of silently listing everything.
    let response = get(
        app.clone(),
        "/api/v1/workflows?etape_actuelle=inconnu",
        &acteurs.chef_service,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_sample_code(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let code = workflow["code_echantillon"].as_str().unwrap();

    let response = get(
        app.clone(),
        &format!("/api/v1/workflows?code_echantillon={}", urlencode(code)),
        &acteurs.chef_projet,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["code_echantillon"].as_str().unwrap(), code);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_active_workflow_per_sample(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let workflow = ouvrir_workflow(app.clone(), &pool, &acteurs.traitement).await;
    let echantillon_id = workflow["echantillon_id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/workflows",
        &acteurs.traitement,
        json!({ "echantillon_id": echantillon_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_workflow_is_not_found(pool: PgPool) {
    let acteurs = seed_acteurs(&pool).await;
    let app = build_test_app(pool.clone());

    let response = get(
        app,
        &format!("/api/v1/workflows/{}", uuid::Uuid::new_v4()),
        &acteurs.chef_projet,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Percent-encode the sample code's `/` for use in a query string.
fn urlencode(code: &str) -> String {
    code.replace('/', "%2F")
}
