// tests/admin_tests.rs

mod common;

use common::{quiz_id_for, register_and_login, seed_admin, spawn_app, unique_suffix};

async fn admin_login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    password: &str,
) -> String {
    let body = client
        .post(format!("{address}/api/admin/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Admin login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse admin login json");

    body["token"]
        .as_str()
        .expect("Token not found")
        .to_string()
}

#[tokio::test]
async fn admin_routes_reject_anonymous_and_non_admin_callers() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();

    // No token at all.
    let anonymous = client
        .get(format!("{}/api/admin/stats", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(anonymous.status().as_u16(), 401);

    // A valid session without the admin role.
    let (_, token) = register_and_login(
        &client,
        &app.address,
        &format!("pleb_{suffix}"),
        &format!("pleb_{suffix}@example.com"),
        "password123",
    )
    .await;

    let forbidden = client
        .get(format!("{}/api/admin/stats", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(forbidden.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_login_rejects_non_admin_accounts() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();
    let email = format!("user_{suffix}@example.com");

    register_and_login(
        &client,
        &app.address,
        &format!("user_{suffix}"),
        &email,
        "password123",
    )
    .await;

    let response = client
        .post(format!("{}/api/admin/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_login_and_stats_work() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();
    let email = format!("admin_{suffix}@example.com");

    seed_admin(&app.pool, &format!("admin_{suffix}"), &email, "adminpass1").await;
    let token = admin_login(&client, &app.address, &email, "adminpass1").await;

    let stats = client
        .get(format!("{}/api/admin/stats", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request")
        .json::<serde_json::Value>()
        .await
        .unwrap();

    assert!(stats["totalUsers"].as_i64().unwrap() >= 1);
    // The catalog migration seeds 3 types x 3 difficulties.
    assert!(stats["totalQuizzes"].as_i64().unwrap() >= 9);
    assert!(stats["totalQuestions"].as_i64().is_some());
    assert!(stats["quizzesTaken"].as_i64().is_some());
}

#[tokio::test]
async fn admin_can_list_users_without_password_hashes() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();
    let email = format!("adm_{suffix}@example.com");

    seed_admin(&app.pool, &format!("adm_{suffix}"), &email, "adminpass1").await;
    let token = admin_login(&client, &app.address, &email, "adminpass1").await;

    let body = client
        .get(format!("{}/api/admin/users", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request")
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let users = body["users"].as_array().unwrap();
    assert!(!users.is_empty());
    for user in users {
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn admin_cannot_delete_self_but_can_delete_others() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();
    let email = format!("boss_{suffix}@example.com");

    let admin_id = seed_admin(&app.pool, &format!("boss_{suffix}"), &email, "adminpass1").await;
    let token = admin_login(&client, &app.address, &email, "adminpass1").await;

    let (victim_id, _) = register_and_login(
        &client,
        &app.address,
        &format!("victim_{suffix}"),
        &format!("victim_{suffix}@example.com"),
        "password123",
    )
    .await;

    let self_delete = client
        .delete(format!("{}/api/admin/users/{admin_id}", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(self_delete.status().as_u16(), 400);

    let delete = client
        .delete(format!("{}/api/admin/users/{victim_id}", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(delete.status().as_u16(), 200);

    // Gone means gone.
    let again = client
        .delete(format!("{}/api/admin/users/{victim_id}", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(again.status().as_u16(), 404);
}

#[tokio::test]
async fn question_crud_flow() {
    // Arrange
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();
    let email = format!("crud_{suffix}@example.com");

    seed_admin(&app.pool, &format!("crud_{suffix}"), &email, "adminpass1").await;
    let token = admin_login(&client, &app.address, &email, "adminpass1").await;
    let quiz_id = quiz_id_for(&app.pool, "javascript", "hard").await;

    // Create
    let created = client
        .post(format!(
            "{}/api/admin/quizzes/{quiz_id}/questions",
            app.address
        ))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({
            "question": "Which keyword declares a block-scoped variable?",
            "option_a": "var",
            "option_b": "let",
            "option_c": "def",
            "option_d": "dim",
            "correct_answer": "B",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(created.status().as_u16(), 201);
    let question_id = created.json::<serde_json::Value>().await.unwrap()["id"]
        .as_i64()
        .unwrap();

    // List: the admin surface does include the correct answer.
    let listed = client
        .get(format!(
            "{}/api/admin/quizzes/{quiz_id}/questions",
            app.address
        ))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request")
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let ours = listed["questions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["id"].as_i64() == Some(question_id))
        .expect("Created question missing from list");
    assert_eq!(ours["correct_answer"], "B");

    // Update
    let updated = client
        .put(format!("{}/api/admin/questions/{question_id}", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({ "option_c": "const", "correct_answer": "B" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(updated.status().as_u16(), 200);

    // Delete
    let deleted = client
        .delete(format!("{}/api/admin/questions/{question_id}", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(deleted.status().as_u16(), 200);

    // Deleting a question that no longer exists is a 404, not a crash.
    let missing = client
        .delete(format!("{}/api/admin/questions/{question_id}", app.address))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn create_question_on_unknown_quiz_returns_404() {
    let Some(app) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let suffix = unique_suffix();
    let email = format!("nf_{suffix}@example.com");

    seed_admin(&app.pool, &format!("nf_{suffix}"), &email, "adminpass1").await;
    let token = admin_login(&client, &app.address, &email, "adminpass1").await;

    let response = client
        .post(format!(
            "{}/api/admin/quizzes/999999/questions",
            app.address
        ))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({
            "question": "Orphan question?",
            "option_a": "A",
            "option_b": "B",
            "option_c": "C",
            "option_d": "D",
            "correct_answer": "A",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}
