//! In-process stores backed by `DashMap`.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{ProductStore, StoreError, StoreResult, UserStore};
use crate::models::auth::{NewUser, User, UserWithPassword};
use crate::models::product::{NewProduct, Product, ProductPatch};
use crate::ids::new_product_id;

/// Users keyed by email.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserWithPassword>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, new: NewUser) -> StoreResult<User> {
        match self.users.entry(new.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "email {} already registered",
                new.email
            ))),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    name: new.name,
                    email: new.email,
                    created_at: Utc::now(),
                };
                slot.insert(UserWithPassword {
                    user: user.clone(),
                    password_hash: new.password_hash,
                });
                Ok(user)
            }
        }
    }
}

/// Products keyed by id.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: DashMap<Uuid, Product>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let mut products: Vec<Product> = self.products.iter().map(|e| e.value().clone()).collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.products.get(&id).map(|e| e.value().clone()))
    }

    async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: new_product_id(),
            name: new.name,
            price: new.price,
            description: new.description,
            image_url: None,
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>> {
        Ok(self.products.get_mut(&id).map(|mut entry| {
            patch.apply(entry.value_mut(), Utc::now());
            entry.value().clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.products.remove(&id).is_some())
    }

    async fn set_image_url(&self, id: Uuid, url: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.get_mut(&id).map(|mut entry| {
            let product = entry.value_mut();
            product.image_url = Some(url.to_string());
            product.updated_at = Utc::now();
            product.clone()
        }))
    }
}
