//! In-memory target for exercising providers without a network.
//!
//! [`InMemoryTarget`] understands just enough DDL to behave like a user
//! store: `CREATE USER`, `ALTER USER` and `DROP USER` act on a set of user
//! names and fail the way a database would when the user is already there
//! or missing. Every other statement is accepted and recorded. Failures and
//! connection refusals can be injected to drive error paths.
//!
//! ```rust
//! use leasehold_config::ConfigHandle;
//! use leasehold_lease::testing::InMemoryTarget;
//! use leasehold_lease::{LeaseProvider, ProviderKind};
//!
//! # tokio_test_block_on(async {
//! let target = InMemoryTarget::new(ProviderKind::Postgres);
//! let provider = target.provider(ConfigHandle::default());
//! let inputs = serde_json::json!({
//!     "host": "db.example.com",
//!     "port": 5432,
//!     "username": "admin",
//!     "password": "admin-password",
//!     "creationStatement": "CREATE USER {{username}};",
//!     "revocationStatement": "DROP USER {{username}};",
//! });
//!
//! let lease = provider.create(&inputs, 1_893_456_000_000).await.unwrap();
//! assert!(target.has_user(&lease.entity_id));
//! assert_eq!(target.open_connections(), 0);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use leasehold_config::ConfigHandle;
use parking_lot::Mutex;

use crate::driver::{DriverError, TargetConnection, TargetDriver};
use crate::inputs::ProviderInputs;
use crate::provider::StatementLeaseProvider;
use crate::registry::ProviderKind;

const PROBE_STATEMENT: &str = "SELECT 1";

#[derive(Debug, Default)]
struct State {
    users: BTreeSet<String>,
    executed: Vec<String>,
    rejections: Vec<(String, String)>,
    refuse_connections: Option<String>,
    never_ready: bool,
    opened: usize,
    closed: usize,
}

impl State {
    fn apply(&mut self, statement: &str) -> Result<(), DriverError> {
        if let Some((_, message)) = self
            .rejections
            .iter()
            .find(|(needle, _)| statement.contains(needle.as_str()))
        {
            return Err(DriverError::new(message.clone()));
        }

        let mut words = statement.split_whitespace();
        let verb = words.next().map(str::to_ascii_uppercase);
        let object = words.next().map(str::to_ascii_uppercase);
        let name = words.next().map(|name| name.trim_matches(['"', '\'', '`']));

        match (verb.as_deref(), object.as_deref(), name) {
            (Some("CREATE"), Some("USER" | "ROLE"), Some(name)) => {
                if !self.users.insert(name.to_owned()) {
                    return Err(DriverError::new(format!(
                        "cannot create user: user name already exists: {name}"
                    )));
                }
            },
            (Some("ALTER"), Some("USER" | "ROLE"), Some(name)) => {
                if !self.users.contains(name) {
                    return Err(DriverError::new(format!("invalid user name: {name}")));
                }
            },
            (Some("DROP"), Some("USER" | "ROLE"), Some(name)) => {
                if !self.users.remove(name) {
                    return Err(DriverError::new(format!("invalid user name: {name}")));
                }
            },
            _ => {},
        }

        self.executed.push(statement.to_owned());
        Ok(())
    }
}

/// Shared view of a fake target. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct InMemoryTarget {
    kind: ProviderKind,
    state: Arc<Mutex<State>>,
}

impl InMemoryTarget {
    /// Empty target reporting itself as `kind`.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            state: Arc::default(),
        }
    }

    /// Fail any statement containing `needle` with `message`.
    pub fn reject_containing(&self, needle: impl Into<String>, message: impl Into<String>) -> &Self {
        self.state
            .lock()
            .rejections
            .push((needle.into(), message.into()));
        self
    }

    /// Fail every subsequent `open` with `message`.
    pub fn refuse_connections(&self, message: impl Into<String>) -> &Self {
        self.state.lock().refuse_connections = Some(message.into());
        self
    }

    /// Open connections that never report ready.
    pub fn never_ready(&self) -> &Self {
        self.state.lock().never_ready = true;
        self
    }

    /// Pre-existing user, as if created outside the engine.
    pub fn seed_user(&self, name: impl Into<String>) -> &Self {
        self.state.lock().users.insert(name.into());
        self
    }

    /// Statements accepted so far, in execution order.
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().executed.clone()
    }

    pub fn users(&self) -> Vec<String> {
        self.state.lock().users.iter().cloned().collect()
    }

    pub fn has_user(&self, name: &str) -> bool {
        self.state.lock().users.contains(name)
    }

    pub fn connections_opened(&self) -> usize {
        self.state.lock().opened
    }

    pub fn connections_closed(&self) -> usize {
        self.state.lock().closed
    }

    /// Connections opened and not yet closed.
    pub fn open_connections(&self) -> usize {
        let state = self.state.lock();
        state.opened - state.closed
    }

    pub fn driver(&self) -> InMemoryDriver {
        InMemoryDriver {
            target: self.clone(),
        }
    }

    /// Provider wired to this target.
    pub fn provider(&self, config: ConfigHandle) -> StatementLeaseProvider<InMemoryDriver> {
        StatementLeaseProvider::new(self.driver(), config)
    }
}

/// [`TargetDriver`] over an [`InMemoryTarget`]
#[derive(Debug, Clone)]
pub struct InMemoryDriver {
    target: InMemoryTarget,
}

/// Connection handed out by [`InMemoryDriver`]
#[derive(Debug)]
pub struct InMemoryConnection {
    state: Arc<Mutex<State>>,
    ready: bool,
}

#[async_trait]
impl TargetDriver for InMemoryDriver {
    type Connection = InMemoryConnection;

    fn kind(&self) -> ProviderKind {
        self.target.kind
    }

    fn probe_statement(&self) -> &'static str {
        PROBE_STATEMENT
    }

    async fn open(&self, _inputs: &ProviderInputs) -> Result<InMemoryConnection, DriverError> {
        let mut state = self.target.state.lock();
        if let Some(message) = &state.refuse_connections {
            return Err(DriverError::new(message.clone()));
        }
        state.opened += 1;
        Ok(InMemoryConnection {
            state: Arc::clone(&self.target.state),
            ready: !state.never_ready,
        })
    }
}

#[async_trait]
impl TargetConnection for InMemoryConnection {
    async fn execute(&mut self, statement: &str) -> Result<(), DriverError> {
        self.state.lock().apply(statement)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn close(self) {
        self.state.lock().closed += 1;
    }
}
