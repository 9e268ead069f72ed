pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod product_service;
pub use product_service::{ProductError, ProductFields, ProductService};

pub mod product_service_impl;
pub use product_service_impl::SeaOrmProductService;
