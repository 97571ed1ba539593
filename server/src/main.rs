use std::thread;
use std::time::Duration;

use fabric::api::API_VERSION;
use log::info;
use network::Configuration;
use server::{spawn_prometheus_metrics_server, FabricServerThread};

fn main() {
    env_logger::init();
    spawn_prometheus_metrics_server(9092);
    let config = Configuration {
        version: API_VERSION.to_string(),
        password: None,
        port: 8080,
    };
    let server = FabricServerThread::spawn(config);
    info!("Fabric server is up on {}", server.address);
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
