pub mod factory;
pub mod jwt;
pub mod validator;

pub use factory::build_validator;
pub use jwt::JwtSignatureValidator;
pub use validator::{TokenValidator, ValidationError};
