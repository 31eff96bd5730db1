mod jetton_transfer_msg;

pub use jetton_transfer_msg::*;
