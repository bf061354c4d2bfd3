//! Output dispatcher
//!
//! Routes commands to outputs by id and drives their timed effects. The
//! runtime only checks that a command names an action; everything else is
//! validated by the adapter.

use nekopaw_protocol::{Category, CommandParams};

use crate::error::BridgeError;
use crate::registry::CapabilityRegistry;
use crate::tick::TickReport;
use crate::traits::OutputCommand;

/// Output command router
#[derive(Debug, Clone, Default)]
pub struct OutputDispatcher {
    /// Commands accepted by an adapter
    executed: u32,
    /// Commands refused by an adapter
    rejected: u32,
}

impl OutputDispatcher {
    pub const fn new() -> Self {
        Self {
            executed: 0,
            rejected: 0,
        }
    }

    /// Execute a validated command
    ///
    /// Adapter failures are passed up unchanged as `Rejected`.
    pub fn execute(
        &mut self,
        registry: &mut CapabilityRegistry<'_>,
        id: &str,
        command: &OutputCommand,
    ) -> Result<(), BridgeError> {
        let adapter = registry.output_mut(id).ok_or(BridgeError::NotFound)?;
        match adapter.execute(command) {
            Ok(()) => {
                self.executed = self.executed.wrapping_add(1);
                debug!("output {}: {}", id, command.action());
                Ok(())
            }
            Err(error) => {
                self.rejected = self.rejected.wrapping_add(1);
                warn!("output {} rejected {}", id, command.action());
                Err(BridgeError::Rejected(error))
            }
        }
    }

    /// Validate raw parameters and execute them
    ///
    /// An unknown id is reported before a missing action.
    pub fn execute_params(
        &mut self,
        registry: &mut CapabilityRegistry<'_>,
        id: &str,
        params: CommandParams,
        now_ms: u32,
    ) -> Result<OutputCommand, BridgeError> {
        registry.find(Category::Output, id)?;
        let command = OutputCommand::new(params, now_ms)?;
        self.execute(registry, id, &command)?;
        Ok(command)
    }

    /// Advance every output once, in registration order
    pub fn tick(&mut self, registry: &mut CapabilityRegistry<'_>, now_ms: u32, report: &mut TickReport) {
        for slot in registry.outputs_mut() {
            if let Err(error) = slot.adapter.tick(now_ms) {
                report.record_fault(slot.descriptor, error);
            }
        }
    }

    pub fn executed(&self) -> u32 {
        self.executed
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}
