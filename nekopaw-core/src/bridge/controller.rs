//! Bridge controller
//!
//! Owns the registry and the four subsystems and runs them in a fixed order
//! once per [`BridgeController::tick`]:
//!
//! 1. inputs are ticked and polled
//! 2. outputs advance their timed effects
//! 3. the display session expires TTLs and confirmation timeouts
//! 4. queued events are handed to the event sink, if one is set
//!
//! Nothing here blocks. The application calls `tick` at least as often as
//! the shortest debounce or timeout any adapter needs.

use heapless::Vec;
use nekopaw_protocol::{Category, CommandParams, ConfirmStatus, RefreshMode, SessionState};

use crate::config::BridgeConfig;
use crate::display::{ConfirmOutcome, ConfirmTicket, DisplaySession};
use crate::error::BridgeError;
use crate::input::{EventSink, InputPoller, DEFAULT_EVENT_QUEUE_LEN};
use crate::output::OutputDispatcher;
use crate::registry::{CapabilityDescriptor, CapabilityRegistry, MAX_SENSORS};
use crate::sensor::{SampledReading, SensorSampler};
use crate::tick::{elapsed_ms, TickReport};
use crate::traits::{
    ConfirmContent, DisplayAdapter, InputAdapter, InputEvent, OutputAdapter, OutputCommand,
    SensorAdapter, TextContent,
};

/// Bridge runtime with an event queue of `Q` entries
pub struct BridgeController<'a, const Q: usize = DEFAULT_EVENT_QUEUE_LEN> {
    config: BridgeConfig,
    started: bool,
    registry: CapabilityRegistry<'a>,
    inputs: InputPoller<Q>,
    outputs: OutputDispatcher,
    sensors: SensorSampler,
    display: DisplaySession,
    sink: Option<&'a mut dyn EventSink>,
    /// Time of the first tick
    epoch_ms: Option<u32>,
    /// Time of the last tick
    now_ms: u32,
    /// Adapter faults since startup
    tick_faults: u32,
}

impl<'a> Default for BridgeController<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BridgeController<'a> {
    /// Controller with the default event queue length
    pub fn new() -> Self {
        Self::with_event_queue()
    }
}

impl<'a, const Q: usize> BridgeController<'a, Q> {
    /// Controller with an event queue of `Q` entries
    pub fn with_event_queue() -> Self {
        let config = BridgeConfig::default();
        Self {
            sensors: SensorSampler::new(config.stale_after_ms),
            config,
            started: false,
            registry: CapabilityRegistry::new(),
            inputs: InputPoller::new(),
            outputs: OutputDispatcher::new(),
            display: DisplaySession::new(),
            sink: None,
            epoch_ms: None,
            now_ms: 0,
            tick_faults: 0,
        }
    }

    /// Validate and apply the configuration
    ///
    /// Opens no socket; the transport serves `config.http_port` itself.
    pub fn begin(&mut self, config: BridgeConfig) -> Result<(), BridgeError> {
        if let Err(err) = config.validate() {
            warn!("invalid bridge config: {}", err);
            return Err(err.into());
        }

        self.sensors.set_stale_after(config.stale_after_ms);
        self.config = config;
        self.started = true;
        info!(
            "bridge {} ready, port {}",
            self.config.device_id.as_str(),
            self.config.http_port
        );
        Ok(())
    }

    // Registration

    /// Install the display, replacing any previous one
    ///
    /// The session starts over; a pending confirmation is dismissed.
    pub fn set_display(&mut self, adapter: &'a mut dyn DisplayAdapter) -> CapabilityDescriptor {
        let descriptor = self.registry.set_display(adapter);
        self.display.reset();
        info!("display registered: {}", descriptor.kind);
        descriptor
    }

    pub fn add_sensor(
        &mut self,
        adapter: &'a mut dyn SensorAdapter,
    ) -> Result<CapabilityDescriptor, BridgeError> {
        let descriptor = self.registry.register_sensor(adapter)?;
        info!("sensor registered: {}", descriptor.id);
        Ok(descriptor)
    }

    pub fn add_input(
        &mut self,
        adapter: &'a mut dyn InputAdapter,
    ) -> Result<CapabilityDescriptor, BridgeError> {
        let descriptor = self.registry.register_input(adapter)?;
        info!("input registered: {}", descriptor.id);
        Ok(descriptor)
    }

    pub fn add_output(
        &mut self,
        adapter: &'a mut dyn OutputAdapter,
    ) -> Result<CapabilityDescriptor, BridgeError> {
        let descriptor = self.registry.register_output(adapter)?;
        info!("output registered: {}", descriptor.id);
        Ok(descriptor)
    }

    /// Deliver events to `sink` after every tick instead of queueing them
    pub fn set_event_sink(&mut self, sink: &'a mut dyn EventSink) {
        self.sink = Some(sink);
    }

    // Event loop

    /// Run one cooperative tick
    pub fn tick(&mut self, now_ms: u32) -> TickReport {
        let mut report = TickReport::new(now_ms);
        self.now_ms = now_ms;
        self.epoch_ms.get_or_insert(now_ms);

        self.inputs.tick(&mut self.registry, now_ms, &mut report);
        self.outputs.tick(&mut self.registry, now_ms, &mut report);
        report.display_expired = self.display.tick(self.registry.display_mut(), now_ms);

        if let Some(sink) = self.sink.as_mut() {
            while let Some(event) = self.inputs.next_event() {
                sink.on_event(&event);
                report.events_delivered = report.events_delivered.saturating_add(1);
            }
        }

        for fault in &report.faults {
            warn!("tick fault: {} {}", fault.source.id, fault.error);
        }
        self.tick_faults = self.tick_faults.saturating_add(report.fault_count() as u32);
        report
    }

    /// Take the oldest unread input event
    pub fn next_event(&mut self) -> Option<InputEvent> {
        self.inputs.next_event()
    }

    /// Unread input events
    pub fn pending_events(&self) -> usize {
        self.inputs.pending()
    }

    /// Events dropped on queue overflow since startup
    pub fn events_dropped(&self) -> u32 {
        self.inputs.overflow_count()
    }

    // Capabilities

    pub fn find(&self, category: Category, id: &str) -> Result<CapabilityDescriptor, BridgeError> {
        self.registry.find(category, id)
    }

    pub fn list(&self, category: Category) -> Vec<CapabilityDescriptor, MAX_SENSORS> {
        self.registry.list(category)
    }

    pub fn read_sensor(&mut self, id: &str) -> Result<SampledReading, BridgeError> {
        self.sensors.read_one(&mut self.registry, id, self.now_ms)
    }

    pub fn read_sensors(&mut self) -> Vec<SampledReading, MAX_SENSORS> {
        self.sensors.read_all(&mut self.registry, self.now_ms)
    }

    /// Execute raw command parameters on an output
    pub fn execute(&mut self, id: &str, params: CommandParams) -> Result<OutputCommand, BridgeError> {
        self.outputs
            .execute_params(&mut self.registry, id, params, self.now_ms)
    }

    /// Execute a prepared command on an output
    pub fn execute_command(&mut self, id: &str, command: &OutputCommand) -> Result<(), BridgeError> {
        self.outputs.execute(&mut self.registry, id, command)
    }

    // Display

    pub fn show_text(
        &mut self,
        content: &TextContent<'_>,
        full_refresh: bool,
    ) -> Result<RefreshMode, BridgeError> {
        self.show_text_for(content, full_refresh, 0)
    }

    /// Show text that clears itself after `ttl_s` seconds (0 keeps it)
    pub fn show_text_for(
        &mut self,
        content: &TextContent<'_>,
        full_refresh: bool,
        ttl_s: u32,
    ) -> Result<RefreshMode, BridgeError> {
        self.display.show_text(
            self.registry.display_mut(),
            content,
            full_refresh,
            Some(ttl_s),
            self.now_ms,
        )
    }

    pub fn show_bitmap(&mut self, data: &[u8], full_refresh: bool) -> Result<RefreshMode, BridgeError> {
        self.show_bitmap_for(data, full_refresh, 0)
    }

    /// Show a bitmap that clears itself after `ttl_s` seconds (0 keeps it)
    pub fn show_bitmap_for(
        &mut self,
        data: &[u8],
        full_refresh: bool,
        ttl_s: u32,
    ) -> Result<RefreshMode, BridgeError> {
        self.display.show_bitmap(
            self.registry.display_mut(),
            data,
            full_refresh,
            Some(ttl_s),
            self.now_ms,
        )
    }

    pub fn show_confirm(
        &mut self,
        content: &ConfirmContent<'_>,
        full_refresh: bool,
    ) -> Result<ConfirmTicket, BridgeError> {
        self.show_confirm_for(content, full_refresh, 0)
    }

    /// Show a prompt that expires after `timeout_s` seconds (0 waits forever)
    pub fn show_confirm_for(
        &mut self,
        content: &ConfirmContent<'_>,
        full_refresh: bool,
        timeout_s: u32,
    ) -> Result<ConfirmTicket, BridgeError> {
        self.display.show_confirm(
            self.registry.display_mut(),
            content,
            full_refresh,
            Some(timeout_s),
            self.now_ms,
        )
    }

    /// Resolve the pending confirmation with the user's answer
    ///
    /// Mapping input events to an answer is left to the application.
    pub fn resolve_confirm(&mut self, accepted: bool) -> Result<ConfirmOutcome, BridgeError> {
        self.display
            .resolve_confirm(self.registry.display_mut(), accepted)
    }

    pub fn confirm_status(&self, ticket: ConfirmTicket) -> Result<ConfirmStatus, BridgeError> {
        self.display.confirm_status(ticket)
    }

    pub fn clear_display(&mut self) -> Result<(), BridgeError> {
        self.display.clear(self.registry.display_mut())
    }

    pub fn display_state(&self) -> SessionState {
        self.display.state()
    }

    // Accessors

    pub fn display_session(&self) -> &DisplaySession {
        &self.display
    }

    pub fn registry(&self) -> &CapabilityRegistry<'a> {
        &self.registry
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn sampler(&self) -> &SensorSampler {
        &self.sensors
    }

    pub fn dispatcher(&self) -> &OutputDispatcher {
        &self.outputs
    }

    /// Returns true after a successful `begin`
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Time of the last tick
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Time since the first tick
    pub fn uptime_ms(&self) -> u32 {
        self.epoch_ms
            .map(|epoch| elapsed_ms(self.now_ms, epoch))
            .unwrap_or(0)
    }

    /// Adapter faults isolated since startup
    pub fn tick_faults(&self) -> u32 {
        self.tick_faults
    }
}
