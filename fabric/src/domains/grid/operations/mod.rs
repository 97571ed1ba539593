mod pin;
mod update_entries;
