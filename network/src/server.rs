use std::collections::HashMap;
use std::net::TcpListener;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fabric::api::{FabricResponse, LoginResult, ViewerRequest};
use log::{error, info, warn};

use crate::metrics::{SERVER_RECEIVED_BYTES, SERVER_SENT_BYTES};
use crate::transfer::{SyncReceiver, SyncSender};

pub struct Viewer {
    pub name: String,
    requests: Receiver<ViewerRequest>,
    responses: Sender<FabricResponse>,
    online: Arc<AtomicBool>,
}

pub struct TrustedViewerRequest {
    pub viewer: String,
    pub request: ViewerRequest,
}

pub struct TcpServer {
    running: Arc<AtomicBool>,
    address: String,
    authorization: Receiver<Viewer>,
    viewers: HashMap<String, Viewer>,
}

pub struct Configuration {
    pub version: String,
    pub password: Option<String>,
    pub port: u16,
}

impl TcpServer {
    pub fn startup(config: Configuration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let (listener_authorization, authorization) = channel();
        spawn_listener(running.clone(), config, listener_authorization);
        Self {
            running,
            address: detect_server_address(),
            authorization,
            viewers: HashMap::new(),
        }
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn address(&self) -> &String {
        &self.address
    }

    pub fn accept_viewers(&mut self) -> Vec<String> {
        let mut viewers = vec![];
        for viewer in self.authorization.try_iter() {
            let name = viewer.name.clone();
            viewers.push(name.clone());
            self.viewers.insert(name, viewer);
        }
        viewers
    }

    pub fn requests(&mut self) -> Vec<TrustedViewerRequest> {
        let mut requests = vec![];
        for viewer in self.viewers.values() {
            let viewer_requests = viewer
                .requests
                .try_iter()
                .map(|request| TrustedViewerRequest {
                    viewer: viewer.name.clone(),
                    request,
                });
            requests.extend(viewer_requests);
        }
        requests
    }

    pub fn broadcast(&mut self, response: FabricResponse) {
        for viewer in self.viewers.values() {
            if viewer.responses.send(response.clone()).is_err() {
                viewer.online.store(false, Ordering::Relaxed);
            }
        }
    }

    pub fn send(&mut self, viewer: String, response: FabricResponse) {
        match self.viewers.get_mut(&viewer) {
            Some(viewer) => {
                if viewer.responses.send(response).is_err() {
                    error!(
                        "Unable to send response, viewer '{}' connection lost",
                        viewer.name
                    );
                    viewer.online.store(false, Ordering::Relaxed);
                }
            }
            None => {
                error!("Unable to send response, viewer '{}' not found", viewer);
            }
        }
    }

    pub fn lost_viewers(&mut self) -> Vec<Viewer> {
        let lost: Vec<String> = self
            .viewers
            .values()
            .filter(|viewer| !viewer.online.load(Ordering::Relaxed))
            .map(|viewer| viewer.name.clone())
            .collect();
        lost.iter()
            .filter_map(|name| self.viewers.remove(name))
            .collect()
    }

    pub fn terminate(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

fn spawn_listener(running: Arc<AtomicBool>, config: Configuration, authorization: Sender<Viewer>) {
    thread::spawn(move || {
        let address = format!("0.0.0.0:{}", config.port);
        info!(
            "Listen viewer connections on {:?} with {} version",
            address, config.version
        );
        let listener = match TcpListener::bind(&address) {
            Ok(listener) => listener,
            Err(error) => {
                error!("Unable to bind listener, {:?}", error);
                return;
            }
        };
        let default_timeout = Some(Duration::from_secs(5));
        while running.load(Ordering::Relaxed) {
            for stream in listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(error) => {
                        error!("Unable to establish connection, {:?}", error);
                        continue;
                    }
                };
                let peer = match stream.peer_addr() {
                    Ok(peer) => peer.to_string(),
                    Err(error) => {
                        error!("Unable to identify peer, {:?}", error);
                        continue;
                    }
                };
                info!("New connection from {:?}", peer);

                if let Err(error) = stream
                    .set_read_timeout(default_timeout)
                    .and_then(|_| stream.set_write_timeout(default_timeout))
                {
                    error!("Unable to configure stream of {}, {:?}", peer, error);
                    continue;
                }
                let (reader, writer) = match (stream.try_clone(), stream) {
                    (Ok(reader), writer) => (reader, writer),
                    (Err(error), _) => {
                        error!("Unable to clone stream of {}, {:?}", peer, error);
                        continue;
                    }
                };
                let mut receiver = SyncReceiver { reader };
                let mut sender = SyncSender { writer };

                // authorization blocks new viewer connections,
                // (should be super fast)
                let request: Option<(usize, ViewerRequest)> = receiver.receive();
                let viewer = match request {
                    Some((
                        _,
                        ViewerRequest::Login {
                            version,
                            viewer,
                            password,
                        },
                    )) => {
                        if version != config.version {
                            warn!(
                                "Unable to authorize '{}' {}, version mismatch {} != {}",
                                viewer, peer, version, config.version
                            );
                            let result = FabricResponse::Login {
                                result: LoginResult::VersionMismatch,
                            };
                            sender.send(&result);
                            continue;
                        }
                        if password != config.password {
                            warn!("Unable to authorize '{}' {}, invalid password", viewer, peer);
                            let result = FabricResponse::Login {
                                result: LoginResult::InvalidPassword,
                            };
                            sender.send(&result);
                            continue;
                        }
                        viewer
                    }
                    _ => {
                        warn!("Unable to authorize {}, invalid login request", peer);
                        continue;
                    }
                };

                let (requests_sender, requests) = channel();
                let (responses, responses_receiver) = channel();
                let online = Arc::new(AtomicBool::new(true));

                let viewer = Viewer {
                    name: viewer,
                    requests,
                    responses,
                    online: online.clone(),
                };

                let viewer_id = viewer.name.clone();
                let viewer_online = online.clone();
                thread::spawn(move || {
                    info!("Start viewer '{}' requests thread", viewer_id);
                    while let Some((bytes, request)) = receiver.receive() {
                        SERVER_RECEIVED_BYTES.inc_by(bytes as u64);
                        if requests_sender.send(request).is_err() {
                            error!("Unable to receive request, server not working");
                            break;
                        }
                    }
                    viewer_online.store(false, Ordering::Relaxed);
                    info!("Stop viewer '{}' requests thread", viewer_id);
                });

                let viewer_id = viewer.name.clone();
                let viewer_online = online;
                thread::spawn(move || {
                    info!("Start viewer '{}' responses thread", viewer_id);

                    let result = FabricResponse::Login {
                        result: LoginResult::Success,
                    };
                    if let Some(bytes) = sender.send(&result) {
                        SERVER_SENT_BYTES.inc_by(bytes as u64);
                    }

                    for response in responses_receiver.iter() {
                        match sender.send(&response) {
                            Some(bytes) => SERVER_SENT_BYTES.inc_by(bytes as u64),
                            None => {
                                error!("Unable to send response, connection lost");
                                break;
                            }
                        }
                    }
                    viewer_online.store(false, Ordering::Relaxed);
                    info!("Stop viewer '{}' responses thread", viewer_id);
                });

                if authorization.send(viewer).is_err() {
                    error!("Unable to authorize {}, server not working", peer);
                    break;
                }
            }
        }
        info!("Server listener terminated")
    });
}

#[cfg(unix)]
fn detect_server_address() -> String {
    match Command::new("sh")
        .arg("-c")
        .arg("ifconfig | grep 'inet ' | grep -v 127.0.0.1 | cut -d' ' -f2")
        .output()
        .map_err(|err| err.to_string())
        .and_then(|output| String::from_utf8(output.stdout).map_err(|err| err.to_string()))
    {
        Ok(ip) => ip.trim().to_string(),
        Err(error) => {
            error!("Unable to detect server local IP, {}", error);
            "127.0.0.1".to_string()
        }
    }
}

#[cfg(not(unix))]
fn detect_server_address() -> String {
    "127.0.0.1".to_string()
}
