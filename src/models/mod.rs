pub mod config;
pub mod product;
pub mod user;

pub use config::{AppConfig, DatabaseConfig, ServerConfig};
pub use product::{Product, ProductInput};
pub use user::{CreateUserRequest, LoginRequest, LoginResponse, User, UserInfo, UserRole};
