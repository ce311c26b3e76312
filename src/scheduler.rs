//! Node scheduler: role-dispatched cooperative tick driver.
//!
//! One periodic tick source drives exactly one role body for the life of
//! the process. Each tick runs to completion before the next is taken;
//! overlapping ticks are coalesced upstream in [`crate::events`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       NodeScheduler                          │
//! │                                                              │
//! │   start(): connect ─▶ role.on_start() ─▶ Started event       │
//! │                                                              │
//! │   tick():                                                    │
//! │   ┌──────────────────────────┐  ┌─────────────────────────┐  │
//! │   │ PublisherNode            │  │ SubscriberNode          │  │
//! │   │ sensor → encode → publish│  │ poll → decode → upsert  │  │
//! │   │                          │  │ → evict → avg → output  │  │
//! │   └──────────────────────────┘  └─────────────────────────┘  │
//! │                                                              │
//! │   every N ticks: Telemetry event                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use log::info;

use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::{ClockPort, EventSink, OutputPort, SensorPort};
use crate::app::publisher::PublisherService;
use crate::app::subscriber::SubscriberService;
use crate::config::Role;
use crate::error::TransportError;
use crate::net::transport::TransportPort;

// ═══════════════════════════════════════════════════════════════
//  Role bodies
// ═══════════════════════════════════════════════════════════════

/// A role-specific tick body.
pub trait RoleNode {
    /// One-time setup after the transport is connected.
    fn on_start<T: TransportPort, E: EventSink>(
        &mut self,
        transport: &mut T,
        sink: &mut E,
    ) -> Result<(), TransportError>;

    /// One tick. Must not fail: every error is handled and reported here.
    fn on_tick<T: TransportPort, C: ClockPort, E: EventSink>(
        &mut self,
        transport: &mut T,
        clock: &C,
        sink: &mut E,
    );

    fn telemetry(&self) -> TelemetryData;
}

/// PUBLISHER role: owns the sensor.
pub struct PublisherNode<S> {
    pub service: PublisherService,
    pub sensor: S,
}

impl<S: SensorPort> RoleNode for PublisherNode<S> {
    fn on_start<T: TransportPort, E: EventSink>(
        &mut self,
        _transport: &mut T,
        _sink: &mut E,
    ) -> Result<(), TransportError> {
        info!("Running as PUBLISHER: {}", self.service.id());
        Ok(())
    }

    fn on_tick<T: TransportPort, C: ClockPort, E: EventSink>(
        &mut self,
        transport: &mut T,
        clock: &C,
        sink: &mut E,
    ) {
        let _outcome = self.service.tick(&mut self.sensor, clock, transport, sink);
    }

    fn telemetry(&self) -> TelemetryData {
        self.service.telemetry()
    }
}

/// SUBSCRIBER role: owns the aggregation engine and the output.
pub struct SubscriberNode<O> {
    pub service: SubscriberService,
    pub output: O,
    pub topic: String,
}

impl<O: OutputPort> RoleNode for SubscriberNode<O> {
    fn on_start<T: TransportPort, E: EventSink>(
        &mut self,
        transport: &mut T,
        _sink: &mut E,
    ) -> Result<(), TransportError> {
        self.service.start(&mut self.output);
        transport.subscribe(&self.topic)?;
        info!("Running as SUBSCRIBER on '{}'", self.topic);
        Ok(())
    }

    fn on_tick<T: TransportPort, C: ClockPort, E: EventSink>(
        &mut self,
        transport: &mut T,
        clock: &C,
        sink: &mut E,
    ) {
        let _outcome = self.service.tick(transport, clock, &mut self.output, sink);
    }

    fn telemetry(&self) -> TelemetryData {
        self.service.telemetry()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Owns the role body and every collaborator it needs.
pub struct NodeScheduler<R, T, C, E> {
    role: Role,
    node: R,
    transport: T,
    clock: C,
    sink: E,
    telemetry_every: u32,
    ticks: u64,
}

impl<R, T, C, E> NodeScheduler<R, T, C, E>
where
    R: RoleNode,
    T: TransportPort,
    C: ClockPort,
    E: EventSink,
{
    pub fn new(role: Role, node: R, transport: T, clock: C, sink: E, telemetry_every: u32) -> Self {
        Self {
            role,
            node,
            transport,
            clock,
            sink,
            telemetry_every: telemetry_every.max(1),
            ticks: 0,
        }
    }

    /// Connect the transport and run the role's setup. Any error is fatal.
    pub fn start(&mut self) -> Result<(), TransportError> {
        self.transport.connect()?;
        info!("Connected to broker");
        self.node.on_start(&mut self.transport, &mut self.sink)?;
        self.sink.emit(&AppEvent::Started(self.role.clone()));
        Ok(())
    }

    /// Run one tick body to completion.
    pub fn tick(&mut self) {
        self.ticks += 1;
        self.node
            .on_tick(&mut self.transport, &self.clock, &mut self.sink);

        if self.ticks % u64::from(self.telemetry_every) == 0 {
            let t = self.node.telemetry();
            self.sink.emit(&AppEvent::Telemetry(t));
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn node(&self) -> &R {
        &self.node
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
