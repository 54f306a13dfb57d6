#![allow(dead_code)]
//! Throw-away SQLite stores for the integration tests.
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use storefront_engine::{
    db_types::{Cents, NewOrderLine},
    order_objects::OrderRequest,
    OrderManagement,
    SqliteDatabase,
};

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CREDIT_CARD: i64 = 1;
pub const WIDGET: i64 = 5;
pub const GADGET: i64 = 7;
pub const GIZMO: i64 = 9;

pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("sf_test_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

/// Creates a fresh database at `url`, migrates it, and adds two clients and three products.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        Sqlite::drop_database(url).await.expect("Error dropping stale database");
    }
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    seed_fixtures(&db).await;
    debug!("🚀️ Test database ready at {url}");
    db
}

async fn seed_fixtures(db: &SqliteDatabase) {
    sqlx::query(
        r#"
        INSERT INTO clients (id, name, email) VALUES
            (1, 'Alice', 'alice@example.com'),
            (2, 'Bob', 'bob@example.com');
        INSERT INTO products (id, name, description, price, image_url) VALUES
            (5, 'Widget', 'A plain widget', 1000, 'https://img.example.com/widget.png'),
            (7, 'Gadget', NULL, 2550, NULL),
            (9, 'Gizmo', 'Small gizmo', 399, 'https://img.example.com/gizmo.png');
        "#,
    )
    .execute(db.pool())
    .await
    .expect("Error seeding test fixtures");
}

pub async fn tear_down(db: SqliteDatabase) {
    let url = db.url().to_string();
    db.close().await;
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Could not drop test database {url}: {e}");
    }
    let path = url.trim_start_matches("sqlite://");
    for suffix in ["-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

/// The order from scenario A: two widgets at 10.00 and a gadget at 25.50.
pub fn scenario_a(client_id: i64) -> OrderRequest {
    OrderRequest::new(client_id, CREDIT_CARD, vec![
        NewOrderLine::new(WIDGET, 2, Cents::from(1000)),
        NewOrderLine::new(GADGET, 1, Cents::from(2550)),
    ])
}

pub async fn count_rows(db: &SqliteDatabase, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .expect("Error counting rows")
}

pub async fn cart_size(db: &SqliteDatabase, client_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE client_id = $1")
        .bind(client_id)
        .fetch_one(db.pool())
        .await
        .expect("Error counting cart lines")
}

/// Counts the client's cart lines on `n` pooled connections held at the same time, so that every connection,
/// including ones other than the writer's, reports what it sees.
pub async fn cart_size_per_connection(db: &SqliteDatabase, client_id: i64, n: usize) -> Vec<i64> {
    let mut conns = Vec::with_capacity(n);
    for _ in 0..n {
        conns.push(db.pool().acquire().await.expect("Error acquiring connection"));
    }
    let mut sizes = Vec::with_capacity(n);
    for conn in conns.iter_mut() {
        let size: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(&mut **conn)
            .await
            .expect("Error counting cart lines");
        sizes.push(size);
    }
    sizes
}

pub async fn fill_cart(db: &SqliteDatabase, client_id: i64) {
    sqlx::query(
        "INSERT INTO cart_items (client_id, product_id, quantity, added_at) VALUES ($1, 5, 2, $2), ($1, 7, 1, $2)",
    )
    .bind(client_id)
    .bind(chrono::Utc::now())
    .execute(db.pool())
    .await
    .expect("Error filling cart");
}
