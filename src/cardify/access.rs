//! Route capability checks.
//!
//! The identity provider hands over `{userId, roles, products}`; route
//! guards only need a yes/no answer for a path. Issuing or verifying tokens
//! happens elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Authenticated,
    Role(String),
    Product(String),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Authenticated => write!(f, "authenticated"),
            Capability::Role(role) => write!(f, "role:{}", role),
            Capability::Product(product) => write!(f, "product:{}", product),
        }
    }
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.products.push(product.into());
        self
    }

    pub fn has(&self, capability: &Capability) -> bool {
        match capability {
            Capability::Authenticated => !self.user_id.trim().is_empty(),
            Capability::Role(role) => self.roles.iter().any(|r| r.eq_ignore_ascii_case(role)),
            Capability::Product(product) => self.products.iter().any(|p| p == product),
        }
    }

    /// True when every capability the path requires is held.
    pub fn allows(&self, path: &str) -> bool {
        required_capabilities(path).iter().all(|c| self.has(c))
    }
}

/// Yes/no check for a possibly anonymous visitor.
pub fn is_allowed(identity: Option<&Identity>, path: &str) -> bool {
    match identity {
        Some(identity) => identity.allows(path),
        None => required_capabilities(path).is_empty(),
    }
}

/// Capabilities needed to open `path`.
///
/// - `/admin/**` needs an authenticated admin.
/// - `/app` needs any authenticated user; `/app/<product>/**` also needs
///   that product.
/// - Everything else is public.
pub fn required_capabilities(path: &str) -> Vec<Capability> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    match segments.next() {
        Some("admin") => vec![
            Capability::Authenticated,
            Capability::Role(ADMIN_ROLE.to_string()),
        ],
        Some("app") => {
            let mut required = vec![Capability::Authenticated];
            if let Some(product) = segments.next() {
                required.push(Capability::Product(product.to_string()));
            }
            required
        }
        _ => Vec::new(),
    }
}
