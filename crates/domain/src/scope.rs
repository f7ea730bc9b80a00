//! Organizational scopes and ancestor chains.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bidgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Identifier reserved for the single system scope.
pub const SYSTEM_SCOPE_ID: &str = "system";

/// Level of an organizational scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// A single school.
    School,
    /// A school district.
    District,
    /// A purchasing cooperative grouping districts.
    Cooperative,
    /// The root of the hierarchy.
    System,
}

impl ScopeType {
    /// Returns a stable storage value for this scope type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::School => "school",
            Self::District => "district",
            Self::Cooperative => "cooperative",
            Self::System => "system",
        }
    }

    /// Returns whether `parent` may be the direct parent of a scope of this type.
    ///
    /// A school always sits under a district. Districts and cooperatives without an
    /// explicit parent hang directly off the system root.
    #[must_use]
    pub fn allows_parent(&self, parent: ScopeType) -> bool {
        match self {
            Self::School => parent == Self::District,
            Self::District => matches!(parent, Self::Cooperative | Self::System),
            Self::Cooperative => parent == Self::System,
            Self::System => false,
        }
    }
}

impl FromStr for ScopeType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "school" => Ok(Self::School),
            "district" => Ok(Self::District),
            "cooperative" => Ok(Self::Cooperative),
            "system" => Ok(Self::System),
            _ => Err(AppError::Validation(format!(
                "unknown scope type '{value}'"
            ))),
        }
    }
}

impl Display for ScopeType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Organizational coordinate used to bound where a role applies.
///
/// Two scopes are the same coordinate when their type and id match; the optional
/// display name does not take part in equality or hashing.
#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    #[serde(rename = "type")]
    scope_type: ScopeType,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Scope {
    /// Creates a scope coordinate.
    pub fn new(scope_type: ScopeType, id: impl Into<String>) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;
        if scope_type == ScopeType::System && id.as_str() != SYSTEM_SCOPE_ID {
            return Err(AppError::Validation(format!(
                "system scope id must be '{SYSTEM_SCOPE_ID}', got '{}'",
                id.as_str()
            )));
        }

        Ok(Self {
            scope_type,
            id: id.into(),
            name: None,
        })
    }

    /// Returns the system root scope.
    #[must_use]
    pub fn system() -> Self {
        Self {
            scope_type: ScopeType::System,
            id: SYSTEM_SCOPE_ID.to_owned(),
            name: None,
        }
    }

    /// Creates a cooperative scope.
    pub fn cooperative(id: impl Into<String>) -> AppResult<Self> {
        Self::new(ScopeType::Cooperative, id)
    }

    /// Creates a district scope.
    pub fn district(id: impl Into<String>) -> AppResult<Self> {
        Self::new(ScopeType::District, id)
    }

    /// Creates a school scope.
    pub fn school(id: impl Into<String>) -> AppResult<Self> {
        Self::new(ScopeType::School, id)
    }

    /// Attaches a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the scope level.
    #[must_use]
    pub fn scope_type(&self) -> ScopeType {
        self.scope_type
    }

    /// Returns the scope identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns whether this is the system root.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.scope_type == ScopeType::System
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.scope_type == other.scope_type && self.id == other.id
    }
}

impl Eq for Scope {}

impl Hash for Scope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scope_type.hash(state);
        self.id.hash(state);
    }
}

impl Display for Scope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.scope_type, self.id)
    }
}

/// Ordered path from a scope up through its parents to the system root.
///
/// The first entry is the scope the chain was resolved for and the last entry is
/// always the system scope. Every step moves strictly up the hierarchy, so a chain is
/// acyclic and holds at most four scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorChain {
    scopes: Vec<Scope>,
}

impl AncestorChain {
    /// Creates a validated chain from `[scope, parent, ..., system]`.
    pub fn new(scopes: Vec<Scope>) -> AppResult<Self> {
        let Some(last) = scopes.last() else {
            return Err(AppError::Validation(
                "ancestor chain must not be empty".to_owned(),
            ));
        };

        if !last.is_system() {
            return Err(AppError::Validation(format!(
                "ancestor chain must end at the system scope, ended at '{last}'"
            )));
        }

        for pair in scopes.windows(2) {
            let (child, parent) = (&pair[0], &pair[1]);
            if !child.scope_type().allows_parent(parent.scope_type()) {
                return Err(AppError::Validation(format!(
                    "scope '{parent}' cannot be the parent of '{child}'"
                )));
            }
        }

        Ok(Self { scopes })
    }

    /// Returns the chain for the system root.
    #[must_use]
    pub fn system() -> Self {
        Self {
            scopes: vec![Scope::system()],
        }
    }

    /// Returns the scope this chain was resolved for.
    #[must_use]
    pub fn target(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Returns whether `scope` is the target or one of its ancestors.
    #[must_use]
    pub fn contains(&self, scope: &Scope) -> bool {
        self.scopes.iter().any(|value| value == scope)
    }

    /// Returns the chain of an intermediate scope, which is the suffix starting at it.
    #[must_use]
    pub fn chain_from(&self, scope: &Scope) -> Option<Self> {
        self.scopes
            .iter()
            .position(|value| value == scope)
            .map(|index| Self {
                scopes: self.scopes[index..].to_vec(),
            })
    }

    /// Iterates scopes from the target up to the system root.
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Returns the number of scopes in the chain, including the target and the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false; a chain holds at least the system scope.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
