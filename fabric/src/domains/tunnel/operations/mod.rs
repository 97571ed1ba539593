mod distribute;
mod forward;
mod ports;
