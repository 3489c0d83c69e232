// Session state as reported by the identity provider
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_signed_in: bool,
    pub is_loaded: bool,
}

impl SessionState {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn signed_in() -> Self {
        Self {
            is_signed_in: true,
            is_loaded: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            is_signed_in: false,
            is_loaded: true,
        }
    }
}
