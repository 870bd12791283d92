//! Security adapters: credential hashing and the store-backed login service.

mod argon2_hasher;
mod store_login_service;

pub use argon2_hasher::Argon2CredentialHasher;
pub use store_login_service::StoreLoginService;
