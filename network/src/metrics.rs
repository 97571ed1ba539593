use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};

lazy_static! {
    pub static ref SERVER_SENT_BYTES: IntCounter =
        register_int_counter!("server_sent_bytes", "server_sent_bytes").unwrap();
    pub static ref SERVER_RECEIVED_BYTES: IntCounter =
        register_int_counter!("server_received_bytes", "server_received_bytes").unwrap();
    pub static ref CLIENT_SENT_BYTES: IntCounter =
        register_int_counter!("client_sent_bytes", "client_sent_bytes").unwrap();
    pub static ref CLIENT_RECEIVED_BYTES: IntCounter =
        register_int_counter!("client_received_bytes", "client_received_bytes").unwrap();
}
