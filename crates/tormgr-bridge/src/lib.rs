//! Extension bridge
//!
//! Lets one context (a popup, a UI) call the domain endpoints that live in a
//! privileged background context. Calls travel as JSON messages:
//!
//! ```text
//! request:  {"type":"api","msg":{"endpoint":"Folders","method":"getAll","params":[]}}
//! response: {"res": <value>}  or  {"err": "<message>", "kind": <kind>?}
//! ```
//!
//! Every endpoint method is declared in [`ApiCall`], and [`host::dispatch`]
//! maps each variant to exactly one endpoint call.
//!
//! ```text
//! ┌────────────┐  JSON   ┌────────────┐        ┌────────────┐
//! │  ApiProxy  │ ──────► │ BridgeHost │ ─────► │ Endpoints  │
//! │ (*Api impl)│ ◄────── │ (dispatch) │ ◄───── │ (HTTP)     │
//! └────────────┘         └────────────┘        └────────────┘
//! ```

pub mod error;
pub mod host;
pub mod menu;
pub mod protocol;
pub mod proxy;

pub use error::BridgeError;
pub use host::{channel, BridgeHost, Envelope};
pub use menu::{build_menu, parse_click, MenuClick, MenuController, MenuItem};
pub use protocol::{
    ApiCall, ApiMessage, BridgeRequest, BridgeResponse, ErrorKind, FoldersCall, TorrentsCall,
    UsersCall,
};
pub use proxy::ApiProxy;
