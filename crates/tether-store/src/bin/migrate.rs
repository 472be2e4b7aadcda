use tether_store::{connect, migrate};

#[tokio::main]
async fn main() {
    let db_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .expect("pass a database URL or set DATABASE_URL");
    let pool = connect(&db_url)
        .await
        .expect("failed to connect to database");
    migrate(&pool).await.expect("failed to run migrations");
}
