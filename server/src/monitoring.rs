use std::io::Write;
use std::net::TcpListener;
use std::thread;

use log::error;
use prometheus::{Encoder, TextEncoder};

/// Minimal text exposition endpoint for scraping, one blocking thread.
pub fn spawn_prometheus_metrics_server(port: u16) {
    let spawned = thread::Builder::new().name("prometheus".into()).spawn(move || {
        let encoder = TextEncoder::new();
        let address = format!("127.0.0.1:{}", port);
        let listener = match TcpListener::bind(&address) {
            Ok(listener) => listener,
            Err(error) => {
                error!("Unable to bind metrics listener on {}, {}", address, error);
                return;
            }
        };
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(error) => {
                    error!("Unable to establish metrics connection, {}", error);
                    continue;
                }
            };
            let status_line = "HTTP/1.1 200 OK";
            let mut contents = String::new();
            let metric_families = prometheus::gather();
            if let Err(error) = encoder.encode_utf8(&metric_families, &mut contents) {
                error!("Unable to encode metrics, {}", error);
                continue;
            }
            let length = contents.len();
            let response = format!("{status_line}\r\nContent-Length: {length}\r\n\r\n{contents}");
            if let Err(error) = stream.write_all(response.as_bytes()) {
                error!("Unable to respond with metrics, {}", error);
            }
        }
    });
    if let Err(error) = spawned {
        error!("Unable to spawn metrics thread, {}", error);
    }
}
