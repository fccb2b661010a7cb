// Storage backend abstraction for users and products

pub mod memory;
pub mod mysql;

use crate::models::{Product, ProductInput, User, UserRole};
use async_trait::async_trait;

/// User persistence operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Total number of user accounts, active or not.
    async fn count(&self) -> Result<u64, StorageError>;

    /// Look up an active user by username. Deactivated accounts are not
    /// returned.
    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, StorageError>;

    /// Insert a user and return it with its assigned id.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User, StorageError>;

    /// Overwrite a user's stored password hash.
    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), StorageError>;
}

/// Product persistence operations.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn count(&self) -> Result<u64, StorageError>;

    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>, StorageError>;

    async fn find_by_id(&self, product_id: i64) -> Result<Option<Product>, StorageError>;

    /// Insert a product and return it with its assigned id.
    async fn create(&self, input: &ProductInput, created_by: i64) -> Result<Product, StorageError>;

    /// Update an existing product.
    async fn update(&self, product_id: i64, input: &ProductInput) -> Result<Product, StorageError>;

    async fn delete(&self, product_id: i64) -> Result<(), StorageError>;
}

/// Storage errors
#[derive(Debug, Clone)]
pub enum StorageError {
    NotFound,
    AlreadyExists,
    ConnectionError(String),
    InvalidData(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "Item not found"),
            StorageError::AlreadyExists => write!(f, "Item already exists"),
            StorageError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            StorageError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}
