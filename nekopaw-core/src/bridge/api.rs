//! API request handling
//!
//! Maps routed requests onto controller operations and encodes the results.
//! Errors travel up unchanged and are only translated into a wire kind and
//! HTTP status here.

use alloc::vec::Vec;

use nekopaw_protocol::reports::{
    CapabilityList, ConfirmReport, Descriptor, DeviceReport, DisplayInfo, DisplayReport,
    EventBatch, EventReport, ExecuteReport, ReadingReport, SensorDescriptor, SensorReport,
};
use nekopaw_protocol::{
    parse_json, ApiRequest, ApiResponse, BitmapQuery, Category, CommandParams, ConfirmRequest,
    ConfirmStatus, ErrorKind, ResolveRequest, Route, TextRequest,
};

use super::controller::BridgeController;
use crate::display::ConfirmTicket;
use crate::error::BridgeError;
use crate::registry::CapabilityDescriptor;
use crate::sensor::SampledReading;
use crate::traits::{ConfirmContent, DisplayCapabilities, TextContent};
use crate::traits::display::{DEFAULT_CANCEL_LABEL, DEFAULT_CONFIRM_LABEL};

fn descriptor(d: &CapabilityDescriptor) -> Descriptor<'static> {
    Descriptor {
        id: d.id,
        category: d.category,
        kind: d.kind,
    }
}

fn display_info(caps: DisplayCapabilities) -> DisplayInfo<'static> {
    DisplayInfo {
        width: caps.width,
        height: caps.height,
        kind: caps.kind,
        supports_partial: caps.supports_partial,
    }
}

fn reading(sample: &SampledReading) -> ReadingReport<'static> {
    ReadingReport {
        id: sample.descriptor.id,
        unit: sample.unit,
        value: sample.value(),
        valid: sample.reading.valid,
        timestamp_ms: sample.reading.timestamp_ms,
        age_ms: sample.age_ms,
        stale: sample.stale,
    }
}

fn body<T: serde::de::DeserializeOwned>(request: &ApiRequest<'_>) -> Result<T, BridgeError> {
    parse_json(request.body).map_err(|_| BridgeError::InvalidContent)
}

impl<'a, const Q: usize> BridgeController<'a, Q> {
    /// Handle one API request
    ///
    /// Unknown routes answer `not_found`; malformed bodies answer
    /// `invalid_content`. Refresh defaults to partial.
    pub fn handle(&mut self, request: &ApiRequest<'_>) -> ApiResponse {
        let Some(route) = request.route() else {
            debug!("api: no route for {}", request.path);
            return ApiResponse::error(ErrorKind::NotFound, "unknown route");
        };

        match self.dispatch(route, request) {
            Ok(response) => response,
            Err(err) => {
                debug!("api: {} failed: {}", request.path, err);
                ApiResponse::error(err.kind(), err.message())
            }
        }
    }

    fn dispatch(
        &mut self,
        route: Route<'_>,
        request: &ApiRequest<'_>,
    ) -> Result<ApiResponse, BridgeError> {
        let response = match route {
            Route::Device => ApiResponse::ok(&self.device_report()),
            Route::Capabilities => ApiResponse::ok(&self.capability_list()),
            Route::Sensors => {
                let samples = self.read_sensors();
                let report = SensorReport {
                    sensors: samples.iter().map(reading).collect(),
                };
                ApiResponse::ok(&report)
            }
            Route::Sensor(id) => {
                let sample = self.read_sensor(id)?;
                ApiResponse::ok(&reading(&sample))
            }
            Route::Output(id) => {
                let params: CommandParams = body(request)?;
                let command = self.execute(id, params)?;
                ApiResponse::ok(&ExecuteReport {
                    id,
                    action: command.action(),
                })
            }
            Route::DisplayState => ApiResponse::ok(&self.display_report()),
            Route::DisplayText => {
                let req: TextRequest = body(request)?;
                let content = TextContent {
                    title: req.title.as_deref(),
                    body: req.body.as_deref(),
                    footer: req.footer.as_deref(),
                    style: req.style.unwrap_or_default(),
                };
                let full = req.refresh.unwrap_or_default().is_full();
                self.show_text_for(&content, full, req.ttl.unwrap_or(0))?;
                ApiResponse::ok(&self.display_report())
            }
            Route::DisplayBitmap => {
                let query =
                    BitmapQuery::parse(request.query).map_err(|_| BridgeError::InvalidContent)?;
                let full = query.refresh.unwrap_or_default().is_full();
                self.show_bitmap_for(request.body, full, query.ttl.unwrap_or(0))?;
                ApiResponse::ok(&self.display_report())
            }
            Route::DisplayConfirm => {
                let req: ConfirmRequest = body(request)?;
                let content = ConfirmContent {
                    title: req.title.as_deref(),
                    body: req.body.as_deref(),
                    confirm_label: req.confirm_label.as_deref().unwrap_or(DEFAULT_CONFIRM_LABEL),
                    cancel_label: req.cancel_label.as_deref().unwrap_or(DEFAULT_CANCEL_LABEL),
                    style: req.style.unwrap_or_default(),
                };
                let full = req.refresh.unwrap_or_default().is_full();
                let ticket = self.show_confirm_for(&content, full, req.timeout.unwrap_or(0))?;
                ApiResponse::ok(&ConfirmReport {
                    ticket: ticket.0,
                    status: ConfirmStatus::Pending,
                })
            }
            Route::ConfirmStatus(ticket) => {
                let status = self.confirm_status(ConfirmTicket(ticket))?;
                ApiResponse::ok(&ConfirmReport { ticket, status })
            }
            Route::ResolveConfirm => {
                let req: ResolveRequest = body(request)?;
                let outcome = self.resolve_confirm(req.accepted)?;
                ApiResponse::ok(&ConfirmReport {
                    ticket: outcome.ticket.0,
                    status: outcome.status,
                })
            }
            Route::DisplayClear => {
                self.clear_display()?;
                ApiResponse::ok(&self.display_report())
            }
            Route::Events => {
                let mut events = Vec::with_capacity(self.pending_events());
                while let Some(event) = self.next_event() {
                    events.push(EventReport {
                        source: event.source_id,
                        kind: event.kind,
                        timestamp_ms: event.timestamp_ms,
                    });
                }
                ApiResponse::ok(&EventBatch {
                    events,
                    dropped: self.events_dropped(),
                })
            }
        };
        Ok(response)
    }

    fn device_report(&self) -> DeviceReport<'_> {
        let registry = self.registry();
        DeviceReport {
            device_id: self.config().device_id.as_str(),
            description: self.config().description.as_str(),
            http_port: self.config().http_port,
            uptime_ms: self.uptime_ms(),
            display: registry.display_capabilities().map(display_info),
            sensors: registry.count(Category::Sensor),
            inputs: registry.count(Category::Input),
            outputs: registry.count(Category::Output),
            events_dropped: self.events_dropped(),
            tick_faults: self.tick_faults(),
        }
    }

    fn capability_list(&self) -> CapabilityList<'static> {
        let registry = self.registry();
        CapabilityList {
            display: registry.display_capabilities().map(display_info),
            sensors: registry
                .sensor_infos()
                .iter()
                .map(|info| SensorDescriptor {
                    id: info.id,
                    kind: info.kind,
                    unit: info.unit,
                    description: info.description,
                })
                .collect(),
            inputs: registry.list(Category::Input).iter().map(descriptor).collect(),
            outputs: registry.list(Category::Output).iter().map(descriptor).collect(),
        }
    }

    fn display_report(&self) -> DisplayReport<'_> {
        let session = self.display_session();
        DisplayReport {
            state: session.state(),
            refresh: session.refresh(),
            content: session.content().map(|c| c.report()),
            ticket: session.pending_ticket().map(|t| t.0),
            expires_in_ms: session.expires_in_ms(self.now_ms()),
        }
    }
}
