//! Catalog store: products and registered customers in SQLite.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};

use crate::catalog_model::{NewProduct, NewShopUser, Product, ProductType, ShopUser};
use crate::errors::StoreError;

/// Persistent product catalog
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product and return its assigned id
    async fn create_product(&self, product: &NewProduct) -> Result<i64, StoreError>;

    /// All products, oldest first
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
}

/// Directory of customers who have talked to the bot
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return the existing user for this chat or register a new one.
    /// An existing user's stored profile is left unchanged.
    async fn get_or_create_user(&self, user: &NewShopUser) -> Result<ShopUser, StoreError>;

    async fn get_user_by_chat_id(&self, chat_id: i64) -> Result<Option<ShopUser>, StoreError>;
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL,
            image_id TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id INTEGER NOT NULL UNIQUE,
            username TEXT,
            first_name TEXT,
            language_code TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// SQLite implementation of the catalog and user stores
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `database_url` and initialize the schema
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        if let Some(parent) = options
            .get_filename()
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. Uses a single never-recycled connection,
    /// since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        init_database_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let product_type: String = row.try_get("type")?;
    Ok(Product {
        id: row.try_get("id")?,
        product_type: ProductType::from_str(&product_type)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        image_id: row.try_get("image_id")?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<ShopUser, StoreError> {
    Ok(ShopUser {
        id: row.try_get("id")?,
        chat_id: row.try_get("chat_id")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        language_code: row.try_get("language_code")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ProductRepository for SqliteRepository {
    async fn create_product(&self, product: &NewProduct) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO products (type, name, description, price, image_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product.product_type.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_id)
        .execute(&self.pool)
        .await?;

        let product_id = result.last_insert_rowid();
        info!(product_id, product_type = %product.product_type, "Product created");
        Ok(product_id)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, type, name, description, price, image_id FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let products = rows.iter().map(product_from_row).collect::<Result<Vec<_>, _>>()?;
        debug!(count = products.len(), "Loaded catalog");
        Ok(products)
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_or_create_user(&self, user: &NewShopUser) -> Result<ShopUser, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (chat_id, username, first_name, language_code)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(chat_id) DO NOTHING",
        )
        .bind(user.chat_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.language_code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(user_id = user.chat_id, "Registered new user");
        }

        let row = sqlx::query(
            "SELECT id, chat_id, username, first_name, language_code, created_at
             FROM users WHERE chat_id = ?",
        )
        .bind(user.chat_id)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }

    async fn get_user_by_chat_id(&self, chat_id: i64) -> Result<Option<ShopUser>, StoreError> {
        let row = sqlx::query(
            "SELECT id, chat_id, username, first_name, language_code, created_at
             FROM users WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            product_type: ProductType::Female,
            name: name.to_string(),
            description: "Floral notes".to_string(),
            price,
            image_id: format!("file-{name}"),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_products() -> anyhow::Result<()> {
        let repo = SqliteRepository::in_memory().await?;

        let first = repo.create_product(&sample_product("Rose", 19.99)).await?;
        let second = repo.create_product(&sample_product("Iris", 42.0)).await?;
        assert_ne!(first, second);

        let products = repo.list_products().await?;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, first);
        assert_eq!(products[0].name, "Rose");
        assert_eq!(products[0].price, 19.99);
        assert_eq!(products[0].product_type, ProductType::Female);
        assert_eq!(products[1].image_id, "file-Iris");

        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_empty() -> anyhow::Result<()> {
        let repo = SqliteRepository::in_memory().await?;
        assert!(repo.list_products().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_stored_type_is_reported() -> anyhow::Result<()> {
        let repo = SqliteRepository::in_memory().await?;
        sqlx::query(
            "INSERT INTO products (type, name, description, price, image_id) VALUES ('kids', 'x', 'y', 1.0, 'z')",
        )
        .execute(repo.pool())
        .await?;

        let err = repo.list_products().await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidProductType(ref t) if t == "kids"));
        Ok(())
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() -> anyhow::Result<()> {
        let repo = SqliteRepository::in_memory().await?;
        init_database_schema(repo.pool()).await?;
        init_database_schema(repo.pool()).await?;
        Ok(())
    }
}
