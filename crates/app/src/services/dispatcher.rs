//! Dispatcher — routes change events to the handler registered for their variable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use verasync_domain::delta::SCENE_ACTIVATED;
use verasync_domain::device::Device;
use verasync_domain::error::HandlerError;
use verasync_domain::event::{ChangeEvent, DeviceEvent};

use crate::ports::EventSink;

/// Signature of a caller-provided handler.
pub type CustomHandler =
    dyn Fn(&Device, &ChangeEvent) -> Result<Option<DeviceEvent>, HandlerError> + Send + Sync;

/// What to do when a given variable changes.
#[derive(Clone)]
pub enum Handler {
    /// Motion sensor armed and tripped.
    Tripped,
    /// Instant power draw.
    Power,
    /// Accumulated energy, logged only.
    Energy,
    /// Binary switch state.
    Switch,
    Temperature,
    /// Dimmer or sensor level.
    Level,
    /// Scene controller button press.
    Scene,
    Custom(Arc<CustomHandler>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tripped => f.write_str("Tripped"),
            Self::Power => f.write_str("Power"),
            Self::Energy => f.write_str("Energy"),
            Self::Switch => f.write_str("Switch"),
            Self::Temperature => f.write_str("Temperature"),
            Self::Level => f.write_str("Level"),
            Self::Scene => f.write_str("Scene"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Handler {
    /// Wrap a closure as a custom handler.
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&Device, &ChangeEvent) -> Result<Option<DeviceEvent>, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(Arc::new(handler))
    }

    /// Log the change and build the outbound event, if this handler emits one.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidValue`] when the new value cannot be read
    /// as the type the handler needs, or whatever a custom handler returns.
    pub fn handle(
        &self,
        device: &Device,
        event: &ChangeEvent,
    ) -> Result<Option<DeviceEvent>, HandlerError> {
        let name = device.name.as_str();
        let value = &event.new_value;
        let out = DeviceEvent::for_device(name);
        match self {
            Self::Tripped => {
                let tripped = int_value(event)?;
                tracing::info!(device = name, tripped, "device tripped");
                Ok(Some(out.field("motion_detected", tripped)))
            }
            Self::Power => {
                let watts = float_value(event)?;
                tracing::info!(device = name, watts, "power draw changed");
                Ok(Some(out.field("current_power", watts)))
            }
            Self::Energy => {
                tracing::info!(device = name, kwh = %value, "kWh used");
                Ok(None)
            }
            Self::Switch => {
                let state = value.to_bool().ok_or_else(|| invalid(event, "boolean"))?;
                tracing::info!(device = name, "turned {}", if state { "on" } else { "off" });
                Ok(Some(
                    out.field("reason", "state")
                        .field("previous-state", !state)
                        .field("state", state),
                ))
            }
            Self::Temperature => {
                let level = float_value(event)?;
                tracing::info!(device = name, temperature = level, "temperature changed");
                Ok(Some(out.field("level", level)))
            }
            Self::Level => {
                let level = float_value(event)?;
                tracing::info!(device = name, level, "level changed");
                Ok(Some(out.field("level", level)))
            }
            Self::Scene => {
                let button = int_value(event)?;
                tracing::info!(device = name, button, "button pressed");
                Ok(Some(out.field("button", button)))
            }
            Self::Custom(handler) => handler(device, event),
        }
    }
}

fn invalid(event: &ChangeEvent, expected: &'static str) -> HandlerError {
    HandlerError::InvalidValue {
        variable: event.variable.clone(),
        value: event.new_value.clone(),
        expected,
    }
}

fn int_value(event: &ChangeEvent) -> Result<i64, HandlerError> {
    event
        .new_value
        .to_i64()
        .ok_or_else(|| invalid(event, "integer"))
}

fn float_value(event: &ChangeEvent) -> Result<f64, HandlerError> {
    event
        .new_value
        .to_f64()
        .ok_or_else(|| invalid(event, "float"))
}

/// Handlers installed by [`Dispatcher::new`].
#[must_use]
pub fn builtin_handlers() -> HashMap<String, Handler> {
    [
        ("ArmedTripped", Handler::Tripped),
        ("Watts", Handler::Power),
        ("KWH", Handler::Energy),
        ("Status", Handler::Switch),
        ("CurrentTemperature", Handler::Temperature),
        ("CurrentLevel", Handler::Level),
        (SCENE_ACTIVATED, Handler::Scene),
    ]
    .into_iter()
    .map(|(variable, handler)| (variable.to_string(), handler))
    .collect()
}

/// Looks up the handler for each change and forwards what it produces to the sink.
pub struct Dispatcher<S> {
    sink: S,
    handlers: HashMap<String, Handler>,
}

impl<S: EventSink> Dispatcher<S> {
    /// Dispatcher with the built-in handler table.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            handlers: builtin_handlers(),
        }
    }

    /// Dispatcher with no handlers at all.
    pub fn empty(sink: S) -> Self {
        Self {
            sink,
            handlers: HashMap::new(),
        }
    }

    /// Install a handler, returning the one it replaced.
    pub fn register(&mut self, variable: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.handlers.insert(variable.into(), handler)
    }

    #[must_use]
    pub fn handler(&self, variable: &str) -> Option<&Handler> {
        self.handlers.get(variable)
    }

    /// Run the handler for `event.variable`, if any.
    ///
    /// Handler failures are logged and swallowed. Returns whether an event
    /// reached the sink.
    pub fn dispatch(&self, event: &ChangeEvent, device: &Device) -> bool {
        let Some(handler) = self.handlers.get(&event.variable) else {
            return false;
        };
        match handler.handle(device, event) {
            Ok(Some(out)) => {
                self.sink.send(out);
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::error!(
                    device = %event.device,
                    variable = %event.variable,
                    error = %err,
                    "handler failed"
                );
                false
            }
        }
    }
}
