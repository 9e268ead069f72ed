use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::product::{Product, ProductInput};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path = Path::new(path_str);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                info!("Creating database file at {}", path_str);
                tokio::fs::File::create(path)
                    .await
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    // ========== User Repository Methods ==========

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<User>> {
        self.user_repo().create(username, password_hash).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Product Repository Methods ==========

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    pub async fn add_product(&self, owner: i32, input: &ProductInput) -> Result<Product> {
        self.product_repo().add(owner, input).await
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<Product>> {
        self.product_repo().get(id).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.product_repo().list_all().await
    }

    pub async fn list_products_for_owner(&self, owner: i32) -> Result<Vec<Product>> {
        self.product_repo().list_for_owner(owner).await
    }

    pub async fn update_product(&self, id: i32, input: &ProductInput) -> Result<bool> {
        self.product_repo().update(id, input).await
    }

    pub async fn remove_product(&self, id: i32) -> Result<bool> {
        self.product_repo().remove(id).await
    }
}
