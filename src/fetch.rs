//! Background fetch tasks
//!
//! Location lookups and fetch sequences run as tokio tasks and report back
//! to the event loop over a channel, so the UI keeps redrawing while
//! requests are outstanding.

use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::FetchRequest;
use crate::data::{Coordinates, WeatherClient, WeatherError, WeatherSnapshot};
use crate::location::LocationSource;

/// Messages sent from background tasks to the main app
#[derive(Debug)]
pub enum FetchMessage {
    /// The startup location lookup produced a position
    Located(Coordinates),
    /// A fetch sequence settled
    Completed {
        request: FetchRequest,
        result: Result<WeatherSnapshot, WeatherError>,
    },
}

/// Builds the HTTP client shared by the weather client and the location lookup
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Runs one fetch sequence to completion
pub async fn run_fetch(client: &WeatherClient, request: FetchRequest) -> FetchMessage {
    let result = client.fetch(&request.query).await;
    FetchMessage::Completed { request, result }
}

/// Handle for spawning background work and receiving its results
pub struct FetchHandle {
    /// Channel for receiving fetch messages
    pub receiver: mpsc::Receiver<FetchMessage>,
    sender: mpsc::Sender<FetchMessage>,
    client: WeatherClient,
}

impl FetchHandle {
    /// Creates a new FetchHandle around a weather client
    pub fn new(client: WeatherClient) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            receiver,
            sender,
            client,
        }
    }

    /// Resolves the startup location once in the background
    ///
    /// On success a `Located` message is sent. Failures only reach the log.
    pub fn spawn_locate(&self, source: LocationSource, http: Client) {
        let tx = self.sender.clone();
        tokio::spawn(async move {
            match source.resolve(&http).await {
                Ok(coords) => {
                    if tx.send(FetchMessage::Located(coords)).await.is_err() {
                        debug!("receiver dropped before location resolved");
                    }
                }
                Err(e) => {
                    info!(error = %e, "location unavailable, waiting for a city search");
                }
            }
        });
    }

    /// Runs a fetch sequence in the background
    pub fn spawn_fetch(&self, request: FetchRequest) {
        let tx = self.sender.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let ticket = request.ticket;
            let message = run_fetch(&client, request).await;
            if tx.send(message).await.is_err() {
                debug!(ticket, "receiver dropped before fetch completed");
            }
        });
    }
}

/// Checks for a pending fetch message without blocking
///
/// # Arguments
/// * `handle` - The FetchHandle to check
///
/// # Returns
/// * `Some(FetchMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut FetchHandle) -> Option<FetchMessage> {
    handle.receiver.try_recv().ok()
}
