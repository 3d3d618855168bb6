pub mod board_io;
pub mod lock;
pub mod recovery;
pub mod state;
pub mod store;
