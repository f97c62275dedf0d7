//! Run-scoped context passed to every collaborator call.

use serde::{Deserialize, Serialize};

/// Family of source profiles sharing the same table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFamily {
    /// Shopware 5.x shops (`s_articles`, `s_articles_supplier`, ...).
    Shopware,
    /// Any profile this crate has no readers for.
    Other,
}

/// Source profile selected for a connection, e.g. `shopware55`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    name: String,
}

impl Profile {
    /// Create a profile from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Profile name as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family derived from the profile name. Only Shopware 5.x profiles
    /// (`shopware5x`) share the `s_articles` layout.
    pub fn family(&self) -> ProfileFamily {
        if self.name.to_ascii_lowercase().starts_with("shopware5") {
            ProfileFamily::Shopware
        } else {
            ProfileFamily::Other
        }
    }
}

/// One configured source-to-destination migration link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection identifier; premapping and mappings are scoped by it.
    pub id: String,
    /// Source profile.
    pub profile: Profile,
}

/// Context of the migration run a conversion or premapping belongs to.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    connection: Connection,
}

impl MigrationContext {
    /// Create a context for a connection.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// The connection being migrated.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Shorthand for `connection().id`.
    pub fn connection_id(&self) -> &str {
        &self.connection.id
    }

    /// Source profile of the connection.
    pub fn profile(&self) -> &Profile {
        &self.connection.profile
    }
}

/// Destination-side request context handed through to resolvers and
/// repositories.
#[derive(Debug, Clone, Default)]
pub struct Context;
