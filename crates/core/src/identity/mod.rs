//! Identity gateway: token validation, signup and password sign-in.
//!
//! The [`IdentityGateway`] trait is the port the HTTP layer talks to.
//! [`SupabaseAuthClient`] implements it against the Supabase auth REST API.

mod error;
mod supabase;

pub use error::GatewayError;
pub use supabase::SupabaseAuthClient;

use async_trait::async_trait;
use depot_shared::{AuthSession, Identity};

/// Port to the external identity provider.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Resolves the user owning an access token.
    async fn resolve_user(&self, token: &str) -> Result<Identity, GatewayError>;

    /// Creates an account.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// Signs in with e-mail and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, GatewayError>;
}
