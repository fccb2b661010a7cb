// In-memory storage backend implementation
// Suitable for development and testing

use super::{ProductStore, StorageError, UserStore};
use crate::models::{Product, ProductInput, User, UserRole};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory user store.
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn count(&self) -> Result<u64, StorageError> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == username && u.is_active)
            .cloned())
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User, StorageError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == username) {
            return Err(StorageError::AlreadyExists);
        }

        let user = User {
            user_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            full_name: full_name.to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };

        users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StorageError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

/// In-memory product store.
pub struct MemoryProductStore {
    products: Arc<RwLock<HashMap<i64, Product>>>,
    next_id: AtomicI64,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn count(&self) -> Result<u64, StorageError> {
        let products = self.products.read().await;
        Ok(products.len() as u64)
    }

    async fn list(&self) -> Result<Vec<Product>, StorageError> {
        let products = self.products.read().await;

        let mut results: Vec<Product> = products.values().cloned().collect();
        // Newest first; ids break ties within the same timestamp
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.product_id.cmp(&a.product_id))
        });

        Ok(results)
    }

    async fn find_by_id(&self, product_id: i64) -> Result<Option<Product>, StorageError> {
        let products = self.products.read().await;
        Ok(products.get(&product_id).cloned())
    }

    async fn create(&self, input: &ProductInput, created_by: i64) -> Result<Product, StorageError> {
        let mut products = self.products.write().await;

        let product = Product {
            product_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            product_name: input.product_name.clone(),
            description: input.description.clone(),
            quantity: input.quantity,
            price: input.price,
            created_by: Some(created_by),
            created_at: Utc::now(),
            updated_at: None,
        };

        products.insert(product.product_id, product.clone());
        Ok(product)
    }

    async fn update(&self, product_id: i64, input: &ProductInput) -> Result<Product, StorageError> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&product_id).ok_or(StorageError::NotFound)?;

        product.product_name = input.product_name.clone();
        product.description = input.description.clone();
        product.quantity = input.quantity;
        product.price = input.price;
        product.updated_at = Some(Utc::now());

        Ok(product.clone())
    }

    async fn delete(&self, product_id: i64) -> Result<(), StorageError> {
        let mut products = self.products.write().await;
        products.remove(&product_id).ok_or(StorageError::NotFound)?;
        Ok(())
    }
}
