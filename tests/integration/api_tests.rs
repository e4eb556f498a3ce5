//! API integration tests
//!
//! These run against a live server started with the default dev
//! configuration (default JWT secret, migrated database).

use reqwest::Client;
use serde_json::{json, Value};

use ouvrage_server::models::enums::Role;
use ouvrage_server::models::identity::Identity;

const BASE_URL: &str = "http://localhost:8080/api/v1";
const JWT_SECRET: &str = "change-this-secret-in-production";

/// Mint a bearer token for a role. Tokens are normally issued by the
/// external identity service; tests sign their own with the dev secret.
fn token_for(role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Identity {
        sub: format!("it-{}", role),
        subject_id: 1,
        role,
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(JWT_SECRET).expect("Failed to sign token")
}

async fn create_client_entity(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/clients", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No client ID")
}

async fn create_activity(client: &Client, token: &str, client_id: i64) -> i64 {
    let response = client
        .post(format!("{}/activities", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "client_id": client_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["state"], "open");
    body["id"].as_i64().expect("No activity ID")
}

async fn create_model(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/models", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No model ID")
}

async fn delete_entity(client: &Client, token: &str, path: &str) {
    let response = client
        .delete(format!("{}{}", BASE_URL, path))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204, "cleanup failed for {}", path);
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/activities", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_activity_lifecycle() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);
    let technician = token_for(Role::Technician);

    let client_id = create_client_entity(&client, &admin, "IT Lifecycle Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    // Closing without a closing date fails the precondition
    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "target_state": "closed" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 412);

    // Closing with a date succeeds for an administrator
    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "target_state": "closed", "closing_date": "2025-01-10" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["activity"]["state"], "closed");
    assert_eq!(body["activity"]["closed_at"], "2025-01-10");

    // A technician may reopen; the previous closing date stays
    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", technician))
        .json(&json!({ "target_state": "reopened" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["activity"]["state"], "reopened");
    assert_eq!(body["activity"]["closed_at"], "2025-01-10");

    // A technician may not close
    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", technician))
        .json(&json!({ "target_state": "closed", "closing_date": "2025-01-12" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // The same edge succeeds for an administrator
    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "target_state": "closed", "closing_date": "2025-01-12" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["activity"]["state"], "closed");
    assert_eq!(body["activity"]["closed_at"], "2025-01-12");

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_missing_activity_reported_before_role() {
    let client = Client::new();
    let standard = token_for(Role::StandardUser);

    let response = client
        .post(format!("{}/activities/999999999/transition", BASE_URL))
        .header("Authorization", format!("Bearer {}", standard))
        .json(&json!({ "target_state": "closed", "closing_date": "2025-01-10" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_standard_user_cannot_transition() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);
    let standard = token_for(Role::StandardUser);

    let client_id = create_client_entity(&client, &admin, "IT Standard User Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", standard))
        .json(&json!({ "target_state": "closed", "closing_date": "2025-01-10" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_reopen_requires_prior_close() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Reopen Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .post(format!("{}/activities/{}/transition", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "target_state": "reopened" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_allowed_transitions_follow_role() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);
    let technician = token_for(Role::Technician);

    let client_id = create_client_entity(&client, &admin, "IT Allowed Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    // From open, an administrator may close, a technician may do nothing
    let response = client
        .get(format!("{}/activities/{}/transitions", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["current_state"], "open");
    assert_eq!(body["allowed_targets"], json!(["closed"]));

    let response = client
        .get(format!("{}/activities/{}/transitions", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", technician))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["allowed_targets"], json!([]));

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_client_in_use_cannot_be_deleted() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Guarded Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .delete(format!("{}/clients/{}", BASE_URL, client_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // After the activity is gone the delete goes through
    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_model_in_use_cannot_be_deleted() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Model Guard Client").await;
    let model_id = create_model(&client, &admin, "IT Guarded Model").await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "client_id": client_id, "model_id": model_id, "serial": "SN-GUARD-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["id"].as_i64().expect("No equipment ID");

    let response = client
        .delete(format!("{}/models/{}", BASE_URL, model_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    delete_entity(&client, &admin, &format!("/equipment/{}", equipment_id)).await;
    delete_entity(&client, &admin, &format!("/models/{}", model_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_equipment_in_use_cannot_be_deleted() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Equipment Guard Client").await;
    let model_id = create_model(&client, &admin, "IT Equipment Guard Model").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "client_id": client_id, "model_id": model_id, "serial": "SN-EQGUARD-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["id"].as_i64().expect("No equipment ID");

    // A link row blocks the delete
    let response = client
        .post(format!("{}/activities/{}/equipment", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "equipment_id": equipment_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The primary binding blocks it too, once the link is gone
    delete_entity(
        &client,
        &admin,
        &format!("/activities/{}/equipment/{}", activity_id, equipment_id),
    )
    .await;

    let response = client
        .put(format!("{}/activities/{}", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "equipment_id": equipment_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // With the activity gone the delete goes through
    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/equipment/{}", equipment_id)).await;
    delete_entity(&client, &admin, &format!("/models/{}", model_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_serial_without_model_rejected() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Orphan Serial Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    // A serial alone cannot be resolved to an equipment row
    let response = client
        .put(format!("{}/activities/{}", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "serial": "SN-ORPHAN-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["fields"][0]["field"], "serial");

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_equipment_resolution_reuses_row() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Resolver Client").await;
    let model_id = create_model(&client, &admin, "IT Resolver Model").await;
    let activity_id = create_activity(&client, &admin, client_id).await;
    let second_activity_id = create_activity(&client, &admin, client_id).await;

    // First update creates the equipment row
    let response = client
        .put(format!("{}/activities/{}", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "model_id": model_id, "serial": "SN-RESOLVE-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["equipment_id"].as_i64().expect("No equipment bound");

    // Same triple on another activity resolves to the same row
    let response = client
        .put(format!("{}/activities/{}", BASE_URL, second_activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "model_id": model_id, "serial": "SN-RESOLVE-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["equipment_id"].as_i64(), Some(equipment_id));

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/activities/{}", second_activity_id)).await;
    delete_entity(&client, &admin, &format!("/equipment/{}", equipment_id)).await;
    delete_entity(&client, &admin, &format!("/models/{}", model_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_link_rejected() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Link Client").await;
    let model_id = create_model(&client, &admin, "IT Link Model").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "client_id": client_id, "model_id": model_id, "serial": "SN-LINK-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["id"].as_i64().expect("No equipment ID");

    let response = client
        .post(format!("{}/activities/{}/equipment", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "equipment_id": equipment_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Linking the same unit twice is a conflict
    let response = client
        .post(format!("{}/activities/{}/equipment", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "equipment_id": equipment_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/equipment/{}", equipment_id)).await;
    delete_entity(&client, &admin, &format!("/models/{}", model_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_spare_part_usage_guards_part_delete() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Parts Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .post(format!("{}/spare-parts", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "name": "IT Fuse", "code": "F-IT-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let part_id = body["id"].as_i64().expect("No spare part ID");

    // Zero quantity is rejected per field
    let response = client
        .post(format!("{}/activities/{}/spare-parts", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "spare_part_id": part_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["fields"][0]["field"], "quantity");

    let response = client
        .post(format!("{}/activities/{}/spare-parts", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "spare_part_id": part_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let usage_id = body["id"].as_i64().expect("No usage ID");

    // The part cannot be deleted while usage references it
    let response = client
        .delete(format!("{}/spare-parts/{}", BASE_URL, part_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    delete_entity(
        &client,
        &admin,
        &format!("/activities/{}/spare-parts/{}", activity_id, usage_id),
    )
    .await;
    delete_entity(&client, &admin, &format!("/spare-parts/{}", part_id)).await;
    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_hierarchy_counts() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let client_id = create_client_entity(&client, &admin, "IT Hierarchy Client").await;
    let model_id = create_model(&client, &admin, "IT Hierarchy Model").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "client_id": client_id, "model_id": model_id, "serial": "SN-HIER-1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = body["id"].as_i64().expect("No equipment ID");

    let response = client
        .post(format!("{}/activities/{}/equipment", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "equipment_id": equipment_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/hierarchy", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_clients"].is_number());
    assert!(body["total_equipment"].is_number());
    assert!(body["total_activities"].is_number());

    let entry = body["clients"]
        .as_array()
        .expect("No clients array")
        .iter()
        .find(|c| c["id"].as_i64() == Some(client_id))
        .expect("Client missing from hierarchy");
    assert_eq!(entry["equipment_count"].as_i64(), Some(1));
    assert_eq!(entry["activities_count"].as_i64(), Some(1));

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/equipment/{}", equipment_id)).await;
    delete_entity(&client, &admin, &format!("/models/{}", model_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_technician_cannot_delete_activity() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);
    let technician = token_for(Role::Technician);

    let client_id = create_client_entity(&client, &admin, "IT Delete Gate Client").await;
    let activity_id = create_activity(&client, &admin, client_id).await;

    let response = client
        .delete(format!("{}/activities/{}", BASE_URL, activity_id))
        .header("Authorization", format!("Bearer {}", technician))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    delete_entity(&client, &admin, &format!("/activities/{}", activity_id)).await;
    delete_entity(&client, &admin, &format!("/clients/{}", client_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_validation_error_lists_fields() {
    let client = Client::new();
    let admin = token_for(Role::Administrator);

    let response = client
        .post(format!("{}/clients", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "name": "" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["fields"][0]["field"], "name");
    assert!(body["fields"][0]["message"].is_string());
}
