//! Authentication: JWT codec, the request principal, auth cookies and the
//! OAuth2 login flow.

pub mod cookies;
pub mod jwt;
pub mod oauth2;
pub mod principal;

pub use jwt::{Claims, JwtUtil, TokenCategory, TokenError};
pub use principal::{AuthenticatedUser, Principal, Role};
