use crate::cycle::CycleParameters;

/// In-memory state of one tracker session. Nothing here outlives the process.
#[derive(Debug, Clone, Default)]
pub struct Session {
    params: Option<CycleParameters>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn with_params(params: CycleParameters) -> Self {
        let mut session = Session::new();
        session.configure(params);
        session
    }

    pub fn configure(&mut self, params: CycleParameters) {
        log::info!(
            "Tracking cycle from {} ({} day cycle, {} day period)",
            params.last_period_start(),
            params.cycle_length(),
            params.period_length()
        );
        self.params = Some(params);
    }

    pub fn reset(&mut self) {
        log::info!("Session reset");
        self.params = None;
    }

    pub fn params(&self) -> Option<&CycleParameters> {
        self.params.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.params.is_some()
    }
}
