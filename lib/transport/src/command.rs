use serde::Serialize;

use crate::LedState;

#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum OutboundCommand {
    #[serde(rename = "tg_change_state")]
    ChangeState { state: LedState },
}

impl From<LedState> for OutboundCommand {
    fn from(state: LedState) -> Self {
        OutboundCommand::ChangeState { state }
    }
}
