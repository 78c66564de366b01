//! Property names shared by the pipeline stages.

/// Exact-match grouping key for room clustering.
pub const ROOM_ID: &str = "roomId";
/// Human readable room name carried by netbox nodes.
pub const ROOM: &str = "room";
pub const LOAD: &str = "load";
pub const NAME: &str = "name";
pub const NUM_NETBOXES: &str = "num_netboxes";
pub const NUM_ROOMS: &str = "num_rooms";

pub const SPEED: &str = "speed";
pub const LOAD_IN: &str = "load_in";
pub const LOAD_OUT: &str = "load_out";

/// Member list of a room node.
pub const NETBOXES: &str = "netboxes";
/// Member list of a place node.
pub const ROOMS: &str = "rooms";
/// Original edges absorbed into a combined edge.
pub const SUBEDGES: &str = "subedges";
