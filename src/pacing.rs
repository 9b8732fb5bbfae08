use std::time::Duration;

/// Fixed pauses between calls so the services under test are not flooded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacer {
    request_delay: Duration,
    phase_delay: Duration,
}

impl Pacer {
    pub fn new(request_delay: Duration, phase_delay: Duration) -> Self {
        Self {
            request_delay,
            phase_delay,
        }
    }

    /// No pauses at all, used against mock servers.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub async fn between_requests(&self) {
        pause(self.request_delay).await;
    }

    pub async fn between_phases(&self) {
        pause(self.phase_delay).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
