use crate::adapter::AdapterError;
use crate::grid::{GridUpdate, PinnedKey};
use crate::resources::{ResourceKey, ResourcesError};
use crate::storage::StorageError;
use crate::tunnel::TunnelError;

pub const API_VERSION: &str = "0.3";

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum ViewerRequest {
    Heartbeat,
    Login {
        version: String,
        viewer: String,
        password: Option<String>,
    },
    Perform {
        action_id: usize,
        action: Action,
    },
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum Action {
    Insert {
        key: ResourceKey,
        amount: i64,
    },
    Extract {
        key: ResourceKey,
        amount: i64,
    },
    Pin {
        key: ResourceKey,
    },
    Unpin {
        key: ResourceKey,
    },
    SetSearch {
        text: String,
    },
    SetSort {
        field: SortField,
        direction: SortDirection,
    },
    SetPaused {
        paused: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum SortField {
    Name,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum LoginResult {
    Success,
    VersionMismatch,
    InvalidPassword,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum FabricResponse {
    Heartbeat,
    Login {
        result: LoginResult,
    },
    GridUpdate {
        update: GridUpdate,
    },
    PinnedKeys {
        keys: Vec<PinnedKey>,
    },
    ActionError {
        action_id: usize,
        error: ActionError,
    },
    Moved {
        action_id: usize,
        amount: i64,
    },
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum ActionError {
    Test,
    Resources(ResourcesError),
    Storage(StorageError),
    Adapter(AdapterError),
    Tunnel(TunnelError),
}

impl From<ResourcesError> for ActionError {
    fn from(error: ResourcesError) -> Self {
        Self::Resources(error)
    }
}

impl From<StorageError> for ActionError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<AdapterError> for ActionError {
    fn from(error: AdapterError) -> Self {
        Self::Adapter(error)
    }
}

impl From<TunnelError> for ActionError {
    fn from(error: TunnelError) -> Self {
        Self::Tunnel(error)
    }
}
