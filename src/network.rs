//! Simulated backend. Every operation waits for the configured delay and
//! then succeeds; a real client only has to implement `send` differently.

use std::time::Duration;
use anyhow::Result;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use crate::forms::ProfileForm;
use crate::models::Credentials;

#[derive(Debug, Clone)]
pub enum Request {
    Login(Credentials),
    ProviderLogin,
    SaveProfile(ProfileForm),
    DeleteAccount,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Login(_) => "login",
            Request::ProviderLogin => "provider_login",
            Request::SaveProfile(_) => "save_profile",
            Request::DeleteAccount => "delete_account",
        }
    }
}

/// A resolved request, sent back to the event loop.
#[derive(Debug)]
pub struct Completion {
    pub request: Request,
    pub result: Result<()>,
}

#[derive(Debug, Clone)]
pub struct MockBackend {
    delay: Duration,
}

impl MockBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn send(&self, request: &Request) -> Result<()> {
        tracing::debug!(request = request.name(), delay_ms = self.delay.as_millis() as u64, "Simulating request");
        tokio::time::sleep(self.delay).await;
        match request {
            Request::Login(credentials) => {
                tracing::info!(
                    username = %credentials.username,
                    password_len = credentials.password.chars().count(),
                    "Credentials accepted"
                );
            }
            Request::SaveProfile(profile) => tracing::info!(username = %profile.username, "Profile saved"),
            Request::ProviderLogin | Request::DeleteAccount => {}
        }
        Ok(())
    }

    /// Runs `request` on the runtime and reports the completion over `tx`.
    pub fn dispatch(&self, handle: &Handle, request: Request, tx: UnboundedSender<Completion>) {
        let backend = self.clone();
        handle.spawn(async move {
            let result = backend.send(&request).await;
            if tx.send(Completion { request, result }).is_err() {
                tracing::debug!("Event loop gone, dropping completion");
            }
        });
    }
}
