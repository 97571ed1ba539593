use std::fs;
use std::thread;
use std::time::Duration;

use client::GridView;
use fabric::api::FabricResponse;
use fabric::data::Knowledge;
use log::{error, info};
use network::TcpClient;

fn main() {
    env_logger::init();
    let knowledge = match fs::read_to_string("./assets/knowledge.json") {
        Ok(text) => match Knowledge::load(&text) {
            Ok(knowledge) => knowledge,
            Err(error) => {
                error!("Unable to load knowledge, {:?}", error);
                return;
            }
        },
        Err(error) => {
            error!("Unable to read knowledge asset, {}", error);
            return;
        }
    };
    let mut view = GridView::new(knowledge);
    let mut client = match TcpClient::connect("127.0.0.1:8080", "viewer".to_string(), None) {
        Ok(client) => client,
        Err(error) => {
            error!("Unable to connect, {:?}", error);
            return;
        }
    };
    while !client.is_connection_lost() {
        for response in client.responses() {
            match response {
                FabricResponse::GridUpdate { update } => {
                    view.apply(&update);
                    info!("Grid shows {} slots", view.size());
                }
                FabricResponse::PinnedKeys { keys } => {
                    view.set_pinned(keys);
                }
                FabricResponse::Heartbeat => {}
                response => {
                    info!("Response: {:?}", response);
                }
            }
        }
        thread::sleep(Duration::from_millis(50));
    }
    info!("Connection closed");
}
