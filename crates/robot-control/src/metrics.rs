use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct ControlMetrics {
    pub commands_received: IntCounter,
    pub unknown_commands: IntCounter,
    pub actuator_faults: IntCounter,
    pub sessions_served: IntCounter,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub control: ControlMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let counter = |name: &str, help: &str| {
            IntCounter::new(name, help).map_err(|e| format!("metrics init error: {e}"))
        };
        let control = ControlMetrics {
            commands_received: counter("robot_commands_received", "Commands received from the operator")?,
            unknown_commands: counter("robot_unknown_commands", "Received tokens outside the vocabulary")?,
            actuator_faults: counter("robot_actuator_faults", "Commands that ended in a hardware fault")?,
            sessions_served: counter("robot_sessions_served", "Operator sessions accepted")?,
        };
        let registry = Registry::new();
        for c in [
            &control.commands_received,
            &control.unknown_commands,
            &control.actuator_faults,
            &control.sessions_served,
        ] {
            registry
                .register(Box::new(c.clone()))
                .map_err(|e| format!("metrics register error: {e}"))?;
        }
        Ok(Self { registry, control })
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
