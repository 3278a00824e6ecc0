// tests/common/mod.rs

#![allow(dead_code)]

use devquiz_backend::{config::Config, routes, state::AppState, utils::hash::hash_password};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub struct TestApp {
    pub address: String,
    pub pool: PgPool,
}

/// Spawns the app on a random port against the DATABASE_URL database.
///
/// Returns None (with a notice) when no database is configured, so the
/// suite still passes on machines without Postgres.
pub async fn spawn_app() -> Option<TestApp> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_username: None,
        admin_email: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some(TestApp { address, pool })
}

/// A short unique suffix for usernames and emails.
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

/// Registers a user and logs them in, returning (user_id, token).
pub async fn register_and_login(
    client: &reqwest::Client,
    address: &str,
    username: &str,
    email: &str,
    password: &str,
) -> (i64, String) {
    let register = client
        .post(format!("{address}/api/auth/register"))
        .json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
            "confirmPassword": password,
        }))
        .send()
        .await
        .expect("Register failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse register json");

    let user_id = register["userId"].as_i64().expect("userId not returned");

    let login = client
        .post(format!("{address}/api/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token not found").to_string();

    (user_id, token)
}

/// Inserts an admin user directly, returning their id.
pub async fn seed_admin(pool: &PgPool, username: &str, email: &str, password: &str) -> i64 {
    let hashed = hash_password(password).expect("Failed to hash password");

    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password, role) \
         VALUES ($1, $2, $3, 'admin') RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(hashed)
    .fetch_one(pool)
    .await
    .expect("Failed to seed admin user")
}

/// Looks up the catalog id for a (quiz_type, difficulty) pair.
pub async fn quiz_id_for(pool: &PgPool, quiz_type: &str, difficulty: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM quizzes WHERE quiz_type = $1 AND difficulty = $2",
    )
    .bind(quiz_type)
    .bind(difficulty)
    .fetch_one(pool)
    .await
    .expect("Quiz catalog row missing")
}

/// Seeds `n` questions into a quiz, all with the same correct answer.
/// Returns the new question ids.
pub async fn seed_questions(
    pool: &PgPool,
    quiz_id: i64,
    n: usize,
    correct_answer: &str,
) -> Vec<i64> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO questions \
             (quiz_id, question, option_a, option_b, option_c, option_d, correct_answer) \
             VALUES ($1, $2, 'Option A', 'Option B', 'Option C', 'Option D', $3) \
             RETURNING id",
        )
        .bind(quiz_id)
        .bind(format!("Seeded question {i}"))
        .bind(correct_answer)
        .fetch_one(pool)
        .await
        .expect("Failed to seed question");
        ids.push(id);
    }
    ids
}
