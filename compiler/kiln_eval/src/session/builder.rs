//! `SessionBuilder` for creating sessions with various configurations.

use kiln_ir::SharedInterner;

use super::Session;
use crate::stdlib::standard_catalog;
use crate::{
    stdout_handler, CallFrames, CallStack, CancelHandle, HostCatalog, OperandStack,
    OperatorTable, ReloadHandle, SharedHostCatalog, SharedPrintHandler, SharedRegistry,
};

/// Tunable limits of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of nested in-program calls; `None` for unlimited.
    pub max_call_depth: Option<usize>,
    /// Initial operand stack capacity.
    pub stack_capacity: usize,
}

impl SessionConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;
    pub const DEFAULT_STACK_CAPACITY: usize = 64;
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_call_depth: Some(Self::DEFAULT_MAX_CALL_DEPTH),
            stack_capacity: Self::DEFAULT_STACK_CAPACITY,
        }
    }
}

/// Builder for [`Session`].
///
/// Everything is optional. Without an explicit host catalog the session gets
/// the standard one, printing through the configured print handler (stdout
/// by default). The interner, when not given, is taken from the host catalog
/// or the reload handle so that program names and catalog keys agree.
#[derive(Default)]
pub struct SessionBuilder {
    interner: Option<SharedInterner>,
    hosts: Option<SharedHostCatalog>,
    operators: Option<SharedRegistry<OperatorTable>>,
    print_handler: Option<SharedPrintHandler>,
    reload: Option<ReloadHandle>,
    cancel: Option<CancelHandle>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interner shared with the front end producing the programs.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    #[must_use]
    pub fn host_catalog(mut self, catalog: HostCatalog) -> Self {
        self.hosts = Some(SharedRegistry::new(catalog));
        self
    }

    /// Host catalog already shared with other sessions.
    #[must_use]
    pub fn shared_host_catalog(mut self, catalog: SharedHostCatalog) -> Self {
        self.hosts = Some(catalog);
        self
    }

    #[must_use]
    pub fn operators(mut self, operators: OperatorTable) -> Self {
        self.operators = Some(SharedRegistry::new(operators));
        self
    }

    /// Where the standard catalog prints. Ignored by explicit catalogs.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Use an existing snapshot slot, e.g. one a host operation already holds.
    ///
    /// The slot only accepts programs built over its own interner.
    #[must_use]
    pub fn reload_handle(mut self, handle: ReloadHandle) -> Self {
        self.reload = Some(handle);
        self
    }

    #[must_use]
    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    #[must_use]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn stack_capacity(mut self, capacity: usize) -> Self {
        self.config.stack_capacity = capacity;
        self
    }

    pub fn build(self) -> Session {
        let interner = self
            .interner
            .or_else(|| self.hosts.as_ref().map(|h| h.interner().clone()))
            .or_else(|| self.reload.as_ref().map(|r| r.interner().clone()))
            .unwrap_or_default();
        let print_handler = self.print_handler.unwrap_or_else(stdout_handler);
        let hosts = self.hosts.unwrap_or_else(|| {
            SharedRegistry::new(standard_catalog(interner.clone(), &print_handler))
        });
        if !hosts.interner().ptr_eq(&interner) {
            tracing::warn!("host catalog uses a different interner; host calls will not resolve");
        }
        let slot = self
            .reload
            .unwrap_or_else(|| ReloadHandle::new(interner.clone()));
        if !slot.interner().ptr_eq(&interner) {
            tracing::warn!("reload handle uses a different interner; every install will be rejected");
        }

        Session {
            slot,
            interner,
            stack: OperandStack::with_capacity(self.config.stack_capacity),
            frames: CallFrames::new(),
            call_stack: CallStack::new(self.config.max_call_depth),
            hosts,
            operators: self
                .operators
                .unwrap_or_else(|| SharedRegistry::new(OperatorTable::new())),
            print_handler,
            cancel: self.cancel.unwrap_or_default(),
        }
    }
}
