//! Quill Auth — credential resolution, secrets, passwords, JWTs, API key
//! management, single-use token lifecycle, and tenant onboarding.

pub mod admin;
pub mod api_key;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod mailer;
pub mod onboarding;
pub mod password;
pub mod resolver;
pub mod secret;
pub mod service;
pub mod token;

pub use admin::TenantAdminService;
pub use api_key::ApiKeyService;
pub use config::AuthConfig;
pub use error::AuthError;
pub use lifecycle::TokenLifecycle;
pub use mailer::{EmailSender, LogEmailSender};
pub use onboarding::{OnboardingService, RegisterTenant, Registration};
pub use resolver::{CredentialResolver, Credentials};
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::AccessTokenClaims;
