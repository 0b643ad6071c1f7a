pub mod gateway;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod provider;
pub mod session;

pub use gateway::{IdentityGateway, Subscription};
pub use provider::{AuthTokens, IdentityProvider, SignedIn, TokenSettings};
pub use session::Session;
