mod cell;
mod composite;
mod monitored;
