pub mod client_state;
