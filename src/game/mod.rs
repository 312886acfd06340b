pub mod constants;
pub mod events;
pub mod input;
pub mod input_buffer;
pub mod match_result;
pub mod performance;
pub mod session;
pub mod simulator;
pub mod state;
pub mod systems;
