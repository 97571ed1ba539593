pub use monitoring::*;

mod monitoring;

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fabric::adapter::{share_inventory, SlottedInventory};
use fabric::api::{FabricResponse, ViewerRequest};
use fabric::collections::Shared;
use fabric::data::Knowledge;
use fabric::storage::{share_storage, Storage};
use fabric::tunnel::{share_energy, EnergyBuffer, TunnelInput};
use fabric::Fabric;
use lazy_static::lazy_static;
use log::{error, info};
use network::{Configuration, TcpServer};
use prometheus::{register_histogram, register_int_gauge, Histogram, IntGauge};

lazy_static! {
    static ref UPDATE_SECONDS: Histogram =
        register_histogram!("fabric_update_seconds", "fabric_update_seconds").unwrap();
    static ref GRID_ROWS: IntGauge =
        register_int_gauge!("fabric_grid_rows", "fabric_grid_rows").unwrap();
}

pub struct FabricServerThread {
    pub running: Arc<AtomicBool>,
    pub address: String,
}

impl FabricServerThread {
    pub fn spawn(config: Configuration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let (notify_started, started) = channel();
        let running_thread = running.clone();
        let port = config.port;
        let mut server = TcpServer::startup(config);
        let address = format!("{}:{}", server.address(), port);
        thread::spawn(move || {
            info!("Start fabric server thread");
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
            let mut fabric = Fabric::new(knowledge);
            assemble_default_network(&mut fabric);
            if notify_started.send(true).is_err() {
                error!("Unable to notify spawner, parent thread gone");
                return;
            }
            while running_thread.load(Ordering::Relaxed) {
                for viewer in server.accept_viewers() {
                    info!("Add viewer '{}' to fabric", viewer);
                    for response in fabric.look_around() {
                        server.send(viewer.clone(), response);
                    }
                }
                for viewer in server.lost_viewers() {
                    info!("Remove viewer '{}' from fabric", viewer.name);
                }

                for request in server.requests() {
                    match request.request {
                        ViewerRequest::Heartbeat => {}
                        ViewerRequest::Perform { action_id, action } => {
                            match fabric.perform_action(&request.viewer, action_id, action) {
                                Ok(responses) => {
                                    for response in responses {
                                        match response {
                                            FabricResponse::PinnedKeys { .. } => {
                                                server.broadcast(response)
                                            }
                                            response => {
                                                server.send(request.viewer.clone(), response)
                                            }
                                        }
                                    }
                                }
                                Err(error) => server.send(
                                    request.viewer,
                                    FabricResponse::ActionError { action_id, error },
                                ),
                            }
                        }
                        other => {
                            info!("Ignore request [{}]: {:?}", request.viewer, other);
                        }
                    }
                }

                let timer = UPDATE_SECONDS.start_timer();
                let responses = fabric.update();
                timer.observe_duration();
                GRID_ROWS.set(fabric.grid.entries.len() as i64);
                for response in responses {
                    server.broadcast(response);
                }

                thread::sleep(Duration::from_millis(20));
            }
            info!("Stop fabric server thread");
        });
        if started.recv().is_err() {
            error!("Unable to confirm server startup, thread failed early");
        }
        Self { running, address }
    }

    pub fn terminate(&mut self) {
        self.running.store(false, Ordering::Relaxed)
    }
}

/// Demo wiring used until persistent layouts exist: every known cell kind
/// gets one cell, a chest sits behind an adapter, and one tunnel fans out
/// into the mounted cells.
fn assemble_default_network(fabric: &mut Fabric) {
    let cell_kinds = fabric.known.cells.values();
    let mut endpoints: Vec<Shared<dyn Storage>> = vec![];
    for kind in cell_kinds {
        let cell = fabric.storage.create_cell(kind);
        let endpoint: Rc<RefCell<dyn Storage>> = cell.to_rc();
        endpoints.push(Shared::from_rc(endpoint));
    }
    for endpoint in &endpoints {
        fabric.mount(endpoint.clone());
    }

    let chest = share_inventory(SlottedInventory::new("chest", 9, 64));
    let adapter = fabric.adapters.create_adapter(chest, false);
    let adapter: Rc<RefCell<dyn Storage>> = adapter.to_rc();
    fabric.mount(Shared::from_rc(adapter));

    let tunnel_kinds = fabric.known.tunnels.values();
    if let Some(kind) = tunnel_kinds.into_iter().next() {
        let supply = share_storage(SupplyBuffer::default());
        let energy = share_energy(EnergyBuffer { stored: 1000.0 });
        let resources = fabric.known.resources.clone();
        let tunnel = fabric.tunnels.create_tunnel(kind, resources, supply, energy);
        for endpoint in &endpoints {
            tunnel.to_rc().borrow_mut().outputs.push(endpoint.clone());
        }
        fabric.mount(share_storage(TunnelInput { tunnel }));
    }

    let craftable: HashSet<_> = fabric
        .known
        .resources
        .values()
        .into_iter()
        .filter(|kind| kind.craftable)
        .map(|kind| fabric.known.key_of(&kind.name))
        .filter_map(|key| key.ok())
        .collect();
    fabric.set_craftable(craftable);
}

/// Unlimited source backing the demo tunnel.
#[derive(Default)]
struct SupplyBuffer {
    content: fabric::resources::KeyCounter,
}

impl Storage for SupplyBuffer {
    fn insert(
        &mut self,
        key: &fabric::resources::ResourceKey,
        amount: i64,
        mode: fabric::transaction::TransactionMode,
    ) -> i64 {
        if amount <= 0 {
            return 0;
        }
        if mode.is_commit() {
            self.content.add(key, amount);
        }
        amount
    }

    fn extract(
        &mut self,
        key: &fabric::resources::ResourceKey,
        amount: i64,
        mode: fabric::transaction::TransactionMode,
    ) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let removed = amount.min(self.content.get(key));
        if removed > 0 && mode.is_commit() {
            self.content.add(key, -removed);
        }
        removed
    }

    fn enumerate(&mut self, out: &mut fabric::resources::KeyCounter) {
        out.merge(&self.content);
    }

    fn description(&self) -> String {
        "supply buffer".to_string()
    }
}
