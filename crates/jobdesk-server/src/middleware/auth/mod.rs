//! Session authentication.

pub mod extractor;
pub mod jwt;
pub mod resolver;
pub mod types;

pub use extractor::Auth;
pub use jwt::{decode_token, encode_token};
pub use resolver::{
    extract_token, DatabaseSessionResolver, JwtSessionResolver, SessionError, SessionResolver,
};
pub use types::{Claims, Identity, Role, Session, UnknownRole};
