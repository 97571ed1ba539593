use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryIter};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fabric::api::{FabricResponse, LoginResult, ViewerRequest, API_VERSION};
use log::{error, info};

use crate::metrics::{CLIENT_RECEIVED_BYTES, CLIENT_SENT_BYTES};
use crate::transfer::{SyncReceiver, SyncSender};

pub struct TcpClient {
    pub viewer: String,
    requests: Sender<ViewerRequest>,
    responses: Receiver<FabricResponse>,
    online: Arc<AtomicBool>,
}

#[derive(Debug)]
pub enum ConnectionError {
    InvalidAddress(String),
    Io(std::io::Error),
}

impl TcpClient {
    pub fn connect(
        address: &str,
        viewer: String,
        password: Option<String>,
    ) -> Result<Self, ConnectionError> {
        let address: SocketAddr = address
            .parse()
            .map_err(|_| ConnectionError::InvalidAddress(address.to_string()))?;
        info!("Connect to {}, API version is {}", address, API_VERSION);

        let stream = TcpStream::connect(address).map_err(ConnectionError::Io)?;
        let reader = stream.try_clone().map_err(ConnectionError::Io)?;

        let (requests, requests_receiver) = channel::<ViewerRequest>();
        let (responses_sender, responses) = channel::<FabricResponse>();
        let online = Arc::new(AtomicBool::new(true));

        let heartbeat = Duration::from_secs(2);
        let mut receiver = SyncReceiver { reader };
        let mut sender = SyncSender { writer: stream };

        let authorization = ViewerRequest::Login {
            version: API_VERSION.to_string(),
            viewer: viewer.clone(),
            password,
        };
        if let Some(bytes) = sender.send(&authorization) {
            CLIENT_SENT_BYTES.inc_by(bytes as u64);
        }

        let responses_online = online.clone();
        thread::spawn(move || {
            info!("Start client responses thread");
            let login: Option<(usize, FabricResponse)> = receiver.receive();
            match login {
                Some((_, FabricResponse::Login { result })) if result == LoginResult::Success => {
                    info!("Authorization successful");
                }
                _ => {
                    error!("Unable to connect, invalid login response");
                    responses_online.store(false, Ordering::Relaxed);
                    return;
                }
            }
            while let Some((bytes, response)) = receiver.receive() {
                CLIENT_RECEIVED_BYTES.inc_by(bytes as u64);
                if responses_sender.send(response).is_err() {
                    error!("Unable to receive response, client not working");
                    break;
                }
            }
            responses_online.store(false, Ordering::Relaxed);
            info!("Stop client responses thread");
        });

        let requests_online = online.clone();
        thread::spawn(move || {
            info!("Start client requests thread");
            while requests_online.load(Ordering::Relaxed) {
                let request = match requests_receiver.recv_timeout(heartbeat) {
                    Ok(request) => request,
                    Err(RecvTimeoutError::Timeout) => ViewerRequest::Heartbeat,
                    Err(RecvTimeoutError::Disconnected) => {
                        error!("Unable to send request, connection lost");
                        break;
                    }
                };
                match sender.send(&request) {
                    Some(bytes) => CLIENT_SENT_BYTES.inc_by(bytes as u64),
                    None => {
                        error!("Unable to send request, network error");
                        break;
                    }
                }
            }
            requests_online.store(false, Ordering::Relaxed);
            info!("Stop client requests thread");
        });

        let client = TcpClient {
            viewer,
            requests,
            responses,
            online,
        };
        Ok(client)
    }

    pub fn is_connection_lost(&self) -> bool {
        !self.online.load(Ordering::Relaxed)
    }

    pub fn send(&self, request: ViewerRequest) {
        if self.requests.send(request).is_err() {
            error!("Unable to send request, client not working");
        }
    }

    #[inline]
    pub fn responses(&mut self) -> TryIter<FabricResponse> {
        self.responses.try_iter()
    }

    pub fn disconnect(&mut self) {
        self.online.store(false, Ordering::Relaxed);
    }
}
