// MySQL storage backend implementation
// For production use with persistent storage

use super::{ProductStore, StorageError, UserStore};
use crate::models::{Product, ProductInput, User, UserRole};
use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tracing::info;

/// Open a connection pool against the given MySQL URL.
pub async fn connect(url: &str) -> Result<MySqlPool, StorageError> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .map_err(|e| StorageError::ConnectionError(format!("Failed to connect to MySQL: {}", e)))
}

/// Create the tables this application expects if they do not exist yet.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), StorageError> {
    for ddl in [CREATE_USERS, CREATE_PRODUCTS, CREATE_AUDIT_LOGS] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Failed to create table: {}", e)))?;
    }
    info!("Database schema is in place");
    Ok(())
}

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    user_id BIGINT PRIMARY KEY AUTO_INCREMENT,
    username VARCHAR(64) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(128) NOT NULL,
    role VARCHAR(16) NOT NULL DEFAULT 'user',
    is_active TINYINT(1) NOT NULL DEFAULT 1,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const CREATE_PRODUCTS: &str = "CREATE TABLE IF NOT EXISTS products (
    product_id BIGINT PRIMARY KEY AUTO_INCREMENT,
    product_name VARCHAR(128) NOT NULL,
    description TEXT NOT NULL,
    quantity INT NOT NULL DEFAULT 0,
    price DOUBLE NOT NULL DEFAULT 0,
    created_by BIGINT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NULL
)";

const CREATE_AUDIT_LOGS: &str = "CREATE TABLE IF NOT EXISTS audit_logs (
    log_id BIGINT PRIMARY KEY AUTO_INCREMENT,
    user_id BIGINT NULL,
    action_type VARCHAR(16) NOT NULL,
    table_name VARCHAR(64) NOT NULL,
    record_id BIGINT NULL,
    description TEXT NOT NULL,
    ip_address VARCHAR(45) NOT NULL DEFAULT '127.0.0.1',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

fn map_db_err(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StorageError::AlreadyExists,
        other => StorageError::ConnectionError(other.to_string()),
    }
}

fn user_from_row(row: &MySqlRow) -> Result<User, StorageError> {
    let role: String = row
        .try_get("role")
        .map_err(|e| StorageError::InvalidData(e.to_string()))?;

    Ok(User {
        user_id: row
            .try_get("user_id")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        username: row
            .try_get("username")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        full_name: row
            .try_get("full_name")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        role: UserRole::parse(&role),
        is_active: row
            .try_get("is_active")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
    })
}

fn product_from_row(row: &MySqlRow) -> Result<Product, StorageError> {
    Ok(Product {
        product_id: row
            .try_get("product_id")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        product_name: row
            .try_get("product_name")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        quantity: row
            .try_get("quantity")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        price: row
            .try_get("price")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        created_by: row
            .try_get("created_by")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
    })
}

/// MySQL user store.
pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        Ok(count as u64)
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ? AND is_active = 1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User, StorageError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, full_name, role) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(full_name)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        let user_id = result.last_insert_id() as i64;
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| StorageError::ConnectionError("Inserted user not found".to_string()))
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE user_id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

/// MySQL product store.
pub struct MySqlProductStore {
    pool: MySqlPool,
}

impl MySqlProductStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for MySqlProductStore {
    async fn count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        Ok(count as u64)
    }

    async fn list(&self) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at DESC, product_id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn find_by_id(&self, product_id: i64) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query("SELECT * FROM products WHERE product_id = ?")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn create(&self, input: &ProductInput, created_by: i64) -> Result<Product, StorageError> {
        let result = sqlx::query(
            "INSERT INTO products (product_name, description, quantity, price, created_by) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.product_name)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.price)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        let product_id = result.last_insert_id() as i64;
        self.find_by_id(product_id)
            .await?
            .ok_or_else(|| StorageError::ConnectionError("Inserted product not found".to_string()))
    }

    async fn update(&self, product_id: i64, input: &ProductInput) -> Result<Product, StorageError> {
        // Fetch first so a missing row is NotFound rather than a silent no-op
        if self.find_by_id(product_id).await?.is_none() {
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            "UPDATE products SET product_name = ?, description = ?, quantity = ?, price = ?, \
             updated_at = NOW() WHERE product_id = ?",
        )
        .bind(&input.product_name)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.price)
        .bind(product_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        self.find_by_id(product_id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn delete(&self, product_id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
