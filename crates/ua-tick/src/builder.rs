//! Fluent builder for constructing a [`TickDriver`].

use std::collections::HashSet;
use std::sync::Arc;

use ua_core::{SimRng, UnitId};
use ua_lease::{ArbiterConfig, AuthorityArbiter};

use crate::driver::Slot;
use crate::{DecisionModule, DriverConfig, DriverError, DriverResult, TickDriver, UnitRoster};

/// Fluent builder for [`TickDriver<O>`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                     |
/// |----------------------|-----------------------------|
/// | `.arbiter_config(c)` | `ArbiterConfig::default()`  |
/// | `.units(iter)`       | empty roster                |
///
/// # Example
///
/// ```rust,ignore
/// let mut driver = DriverBuilder::new(DriverConfig::default())
///     .module(DefenseModule::new())
///     .module(IdleModule::new())
///     .units((0..40).map(UnitId))
///     .build()?;
/// driver.run(&mut NoopObserver);
/// ```
pub struct DriverBuilder<O> {
    config:         DriverConfig,
    arbiter_config: ArbiterConfig,
    modules:        Vec<Box<dyn DecisionModule<O>>>,
    roster:         UnitRoster,
}

impl<O> DriverBuilder<O> {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            arbiter_config: ArbiterConfig::default(),
            modules:        Vec::new(),
            roster:         UnitRoster::new(),
        }
    }

    pub fn arbiter_config(mut self, config: ArbiterConfig) -> Self {
        self.arbiter_config = config;
        self
    }

    /// Register a module.  Modules run in registration order.
    pub fn module(mut self, module: impl DecisionModule<O> + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn boxed_module(mut self, module: Box<dyn DecisionModule<O>>) -> Self {
        self.modules.push(module);
        self
    }

    /// Units alive at tick 0.
    pub fn units(mut self, units: impl IntoIterator<Item = UnitId>) -> Self {
        for u in units {
            self.roster.spawn(u);
        }
        self
    }

    /// Validate inputs, build the arbiter, and return a ready-to-run driver.
    pub fn build(self) -> DriverResult<TickDriver<O>> {
        self.config.validate()?;
        if self.modules.is_empty() {
            return Err(DriverError::NoModules);
        }

        let mut seen = HashSet::new();
        for (index, m) in self.modules.iter().enumerate() {
            let name = m.name();
            if name.is_empty() {
                return Err(DriverError::EmptyModuleName { index });
            }
            if !seen.insert(name.to_owned()) {
                return Err(DriverError::DuplicateModule(name.to_owned()));
            }
        }

        let arbiter = AuthorityArbiter::new(self.arbiter_config)?;

        let mut master = SimRng::new(self.config.seed);
        let slots = self
            .modules
            .into_iter()
            .enumerate()
            .map(|(i, module)| {
                let name: Arc<str> = Arc::from(module.name());
                let priority = module.priority();
                log::info!("registered module {name} at {priority}");
                Slot { name, priority, rng: master.child(i as u64), module }
            })
            .collect();

        Ok(TickDriver {
            clock:   self.config.make_clock(),
            config:  self.config,
            arbiter,
            roster:  self.roster,
            slots,
            stats:   Default::default(),
        })
    }
}
