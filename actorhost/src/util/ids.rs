// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

// Process-wide RNG for minted ids. Seeded from OS entropy on first use;
// the mutex serializes generation across concurrent activations.
static ID_RNG: Mutex<Option<StdRng>> = Mutex::new(None);

/// Identity of a single actor instance within its actor type.
///
/// The sidecar addresses actors by `(type_name, id)`; the id itself is an
/// opaque non-empty string. Equality and hashing follow the string.
///
/// # Example
/// ```rust
/// use actorhost::util::ActorId;
///
/// let fixed = ActorId::new("order-17");
/// assert_eq!(fixed.as_str(), "order-17");
///
/// let minted = ActorId::random();
/// assert_eq!(minted.as_str().len(), 16); // 16 hex characters
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap an existing id string. The string must be non-empty.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a random 16-hex-character id from a cryptographically seeded
    /// source.
    pub fn random() -> Self {
        let mut guard = ID_RNG.lock();
        let rng = guard.get_or_insert_with(StdRng::from_entropy);
        let raw: [u8; 8] = rng.gen();
        let mut id = String::with_capacity(16);
        for byte in raw {
            use fmt::Write as _;
            let _ = write!(id, "{byte:02x}");
        }
        Self(id)
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
